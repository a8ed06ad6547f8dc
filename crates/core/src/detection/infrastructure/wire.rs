//! JSON shapes exchanged with the detection backend.

use serde::{Deserialize, Serialize};

use crate::shared::data_url::DataUrl;
use crate::shared::detection_result::DetectionResult;
use crate::shared::face::{BoundingBox, Face};
use crate::detection::domain::detection_service::HealthStatus;

#[derive(Serialize)]
pub(super) struct Base64RequestDto<'a> {
    pub image: &'a str,
}

#[derive(Deserialize)]
pub(super) struct DetectResponseDto {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    faces_detected: u32,
    #[serde(default)]
    faces: Vec<FaceDto>,
    #[serde(default)]
    annotated_image: Option<String>,
    #[serde(default)]
    original_filename: Option<String>,
    #[serde(default)]
    saved_filename: Option<String>,
}

#[derive(Deserialize)]
struct FaceDto {
    bbox: [f64; 4],
    confidence: f64,
}

/// FastAPI error body. `detail` is a string for `HTTPException` but a list
/// for request-validation failures, so it stays untyped until inspected.
#[derive(Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub(super) struct HealthDto {
    status: String,
    #[serde(default)]
    timestamp: Option<String>,
}

impl DetectResponseDto {
    pub fn into_domain(self) -> DetectionResult {
        let annotated_image = self
            .annotated_image
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match DataUrl::parse(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::warn!("Ignoring malformed annotated image: {e}");
                    None
                }
            });

        DetectionResult {
            success: self.success,
            faces_detected: self.faces_detected,
            faces: self
                .faces
                .into_iter()
                .map(|f| Face::new(BoundingBox::from_xywh(f.bbox), f.confidence))
                .collect(),
            annotated_image,
            original_filename: self.original_filename,
            saved_filename: self.saved_filename,
        }
    }
}

impl ErrorBodyDto {
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(detail)) => Some(detail),
            _ => None,
        }
    }
}

impl From<HealthDto> for HealthStatus {
    fn from(dto: HealthDto) -> Self {
        HealthStatus {
            status: dto.status,
            timestamp: dto.timestamp,
        }
    }
}
