use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::constants::IMAGE_EXTENSIONS;

/// Replays the image files of a directory in name order, looping forever.
///
/// Useful as a stand-in camera for rehearsals and integration runs: each
/// capture returns the next file's bytes.
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    position: usize,
}

impl ImageSequenceSource {
    /// Lists the directory once; files added later are not picked up.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|e| CaptureError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        files.sort();

        log::debug!("Replaying {} images from {}", files.len(), dir.display());

        Ok(Self {
            dir,
            files,
            position: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        if self.files.is_empty() {
            return Err(CaptureError::NoFrame(format!(
                "no images in {}",
                self.dir.display()
            )));
        }
        let path = &self.files[self.position % self.files.len()];
        self.position = (self.position + 1) % self.files.len();
        fs::read(path).map_err(|e| CaptureError::Io {
            path: path.clone(),
            source: e,
        })
    }
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_files_in_name_order_and_loops() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("002.jpg"), b"second").unwrap();
        fs::write(dir.path().join("001.jpg"), b"first").unwrap();
        let mut source = ImageSequenceSource::new(dir.path()).unwrap();

        assert_eq!(source.len(), 2);
        assert_eq!(source.capture().unwrap(), b"first");
        assert_eq!(source.capture().unwrap(), b"second");
        assert_eq!(source.capture().unwrap(), b"first");
    }

    #[test]
    fn test_ignores_non_image_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
        fs::write(dir.path().join("face.PNG"), b"png").unwrap();
        let mut source = ImageSequenceSource::new(dir.path()).unwrap();

        assert_eq!(source.len(), 1);
        assert_eq!(source.capture().unwrap(), b"png");
    }

    #[test]
    fn test_empty_directory_is_no_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageSequenceSource::new(dir.path()).unwrap();

        assert!(source.is_empty());
        assert!(matches!(source.capture(), Err(CaptureError::NoFrame(_))));
    }

    #[test]
    fn test_missing_directory_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageSequenceSource::new(dir.path().join("nope"));
        assert!(matches!(result, Err(CaptureError::Io { .. })));
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a/b.jpeg")));
        assert!(has_image_extension(Path::new("x.WEBP")));
        assert!(!has_image_extension(Path::new("x.gif")));
        assert!(!has_image_extension(Path::new("noext")));
    }
}
