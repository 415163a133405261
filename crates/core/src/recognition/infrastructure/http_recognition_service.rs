use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::recognition::domain::raw_recognition::RawRecognition;
use crate::recognition::domain::recognition_service::{RecognitionError, RecognitionService};
use crate::shared::captured_image::CapturedImage;
use crate::shared::face_box::FaceBox;
use crate::shared::http_service_config::HttpServiceConfig;

const DETECT_PATH: &str = "face/detect";

/// Wire shape of the `/face/detect` response.
#[derive(Debug, Deserialize)]
struct DetectionPayload {
    #[serde(default)]
    is_recognized: bool,
    #[serde(default)]
    client_id: Option<serde_json::Value>,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    /// `[top, right, bottom, left]`
    #[serde(default)]
    face_location: Option<Vec<f64>>,
}

/// Posts captured frames to the recognition API as multipart uploads.
pub struct HttpRecognitionService {
    http: Client,
    config: HttpServiceConfig,
}

impl HttpRecognitionService {
    pub fn new(config: HttpServiceConfig) -> Result<Self, RecognitionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RecognitionError::Transport)?;
        Ok(Self { http, config })
    }
}

impl RecognitionService for HttpRecognitionService {
    fn recognize(&self, image: &CapturedImage) -> Result<RawRecognition, RecognitionError> {
        let url = self.config.endpoint(DETECT_PATH);
        let part = Part::bytes(image.data().to_vec())
            .file_name(format!("{}-{}.jpg", image.channel(), image.sequence()))
            .mime_str("image/jpeg")
            .map_err(RecognitionError::Transport)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(RecognitionError::Transport)?;

        let status = response.status();
        let body = response.text().map_err(RecognitionError::Transport)?;
        if !status.is_success() {
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_detection(&body)
    }
}

/// Maps a `/face/detect` JSON body onto [`RawRecognition`].
///
/// An identity is only reported when the service flagged the face as
/// recognized; a recognized flag without a location still counts as a
/// claimed face so the classifier can treat it as malformed.
pub fn parse_detection(body: &str) -> Result<RawRecognition, RecognitionError> {
    let payload: DetectionPayload =
        serde_json::from_str(body).map_err(|e| RecognitionError::Malformed(e.to_string()))?;

    let face_box = match payload.face_location {
        None => None,
        Some(location) => {
            let edges: [f64; 4] = location.as_slice().try_into().map_err(|_| {
                RecognitionError::Malformed(format!(
                    "face_location has {} values, expected 4",
                    location.len()
                ))
            })?;
            Some(FaceBox::from_location(edges))
        }
    };

    let identity_id = if payload.is_recognized {
        payload.client_id.and_then(identity_from_json)
    } else {
        None
    };

    Ok(RawRecognition {
        has_face: face_box.is_some() || payload.is_recognized,
        face_box,
        display_name: identity_id.as_ref().and(payload.client_name),
        identity_id,
        confidence: payload.confidence,
    })
}

fn identity_from_json(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}
