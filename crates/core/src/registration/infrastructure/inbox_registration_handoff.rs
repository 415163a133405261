use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use image::{DynamicImage, ImageFormat};
use serde::Serialize;

use crate::registration::domain::registration_handoff::{HandoffError, RegistrationHandoff};
use crate::registration::domain::registration_offer::RegistrationOffer;
use crate::shared::camera_channel::CameraChannel;
use crate::shared::face_box::FaceBox;

#[derive(Serialize)]
struct OfferSidecar<'a> {
    channel: CameraChannel,
    event_id: u64,
    image: &'a str,
    face_crop: Option<&'a str>,
    face_box: FaceBox,
    detected_at_ms: u128,
}

/// Drops unregistered-visitor captures into a directory watched by the
/// registration screen.
///
/// Each offer produces the raw frame, a PNG crop of the face when the frame
/// decodes, and a JSON sidecar describing both.
pub struct InboxRegistrationHandoff {
    inbox: PathBuf,
}

impl InboxRegistrationHandoff {
    pub fn new(inbox: impl Into<PathBuf>) -> Self {
        Self {
            inbox: inbox.into(),
        }
    }

    pub fn inbox(&self) -> &Path {
        &self.inbox
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), HandoffError> {
        let path = self.inbox.join(name);
        std::fs::write(&path, bytes).map_err(|source| HandoffError::Io { path, source })
    }

    fn write_face_crop(&self, name: &str, offer: &RegistrationOffer) -> Option<()> {
        let img = image::load_from_memory(offer.image.data()).ok()?;
        let crop = crop_face(&img, &offer.face_box)?;
        match crop.save_with_format(self.inbox.join(name), ImageFormat::Png) {
            Ok(()) => Some(()),
            Err(e) => {
                log::warn!("Could not save face crop {name}: {e}");
                None
            }
        }
    }
}

impl RegistrationHandoff for InboxRegistrationHandoff {
    fn offer_registration(&self, offer: &RegistrationOffer) -> Result<(), HandoffError> {
        std::fs::create_dir_all(&self.inbox).map_err(|source| HandoffError::Io {
            path: self.inbox.clone(),
            source,
        })?;

        let stem = format!("{}-{}", offer.channel, offer.event_id);
        let extension = image::guess_format(offer.image.data())
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("jpg");

        let image_name = format!("{stem}.{extension}");
        self.write(&image_name, offer.image.data())?;

        let crop_name = format!("{stem}-face.png");
        let face_crop = self
            .write_face_crop(&crop_name, offer)
            .map(|()| crop_name.as_str());

        let sidecar = OfferSidecar {
            channel: offer.channel,
            event_id: offer.event_id,
            image: &image_name,
            face_crop,
            face_box: offer.face_box,
            detected_at_ms: offer
                .detected_at
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
        };
        let json = serde_json::to_vec_pretty(&sidecar)
            .map_err(|e| HandoffError::Encode(e.to_string()))?;
        self.write(&format!("{stem}.json"), &json)?;

        log::info!(
            "Registration offer for {} event #{} written to {}",
            offer.channel,
            offer.event_id,
            self.inbox.display()
        );
        Ok(())
    }
}

/// Crops the face box out of `img`, clamped to the image bounds.
///
/// Returns `None` when the clamped box is empty.
fn crop_face(img: &DynamicImage, face_box: &FaceBox) -> Option<DynamicImage> {
    let (width, height) = (img.width() as f64, img.height() as f64);
    let left = face_box.left.clamp(0.0, width);
    let right = face_box.right.clamp(0.0, width);
    let top = face_box.top.clamp(0.0, height);
    let bottom = face_box.bottom.clamp(0.0, height);

    let w = (right - left).floor() as u32;
    let h = (bottom - top).floor() as u32;
    if w == 0 || h == 0 {
        return None;
    }
    Some(img.crop_imm(left as u32, top as u32, w, h))
}
