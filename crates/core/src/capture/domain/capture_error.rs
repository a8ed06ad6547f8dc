use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::WEBCAM_ERROR_MESSAGE;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("permission to use camera {device} was denied")]
    PermissionDenied { device: String },
    #[error("camera {device} is unavailable: {reason}")]
    Unavailable { device: String, reason: String },
    #[error("camera stream has been stopped")]
    Stopped,
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

impl CaptureError {
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::PermissionDenied { .. }
            | CaptureError::Unavailable { .. }
            | CaptureError::Stopped => WEBCAM_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
