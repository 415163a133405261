use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};

/// Reads the current frame from a snapshot file that a camera process keeps
/// overwriting.
///
/// A missing or empty file means the camera has not produced a frame yet,
/// which is reported as [`CaptureError::NoFrame`] rather than an I/O error.
pub struct SnapshotFileSource {
    path: PathBuf,
}

impl SnapshotFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for SnapshotFileSource {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Err(CaptureError::NoFrame(format!(
                "snapshot {} is empty",
                self.path.display()
            ))),
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CaptureError::NoFrame(format!(
                "snapshot {} does not exist",
                self.path.display()
            ))),
            Err(e) => Err(CaptureError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_current_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.jpg");
        fs::write(&path, b"frame-1").unwrap();
        let mut source = SnapshotFileSource::new(&path);

        assert_eq!(source.capture().unwrap(), b"frame-1");

        fs::write(&path, b"frame-2").unwrap();
        assert_eq!(source.capture().unwrap(), b"frame-2");
    }

    #[test]
    fn test_missing_file_is_no_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SnapshotFileSource::new(dir.path().join("missing.jpg"));

        assert!(matches!(source.capture(), Err(CaptureError::NoFrame(_))));
    }

    #[test]
    fn test_empty_file_is_no_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        fs::write(&path, b"").unwrap();
        let mut source = SnapshotFileSource::new(&path);

        assert!(matches!(source.capture(), Err(CaptureError::NoFrame(_))));
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = SnapshotFileSource::new(dir.path());

        assert!(matches!(source.capture(), Err(CaptureError::Io { .. })));
    }
}
