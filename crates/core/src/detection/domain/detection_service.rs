use crate::capture::domain::selected_image::ImageFile;
use crate::detection::domain::detection_error::DetectionError;
use crate::shared::data_url::DataUrl;
use crate::shared::detection_result::DetectionResult;

/// Backend liveness as reported by its health endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Domain interface to the remote face detector.
///
/// Both detection calls share one response and error contract; they differ
/// only in how the image travels (multipart bytes vs. a base64 data URL).
pub trait DetectionService: Send {
    fn detect_file(&self, image: &ImageFile) -> Result<DetectionResult, DetectionError>;

    fn detect_data_url(&self, image: &DataUrl) -> Result<DetectionResult, DetectionError>;

    fn health(&self) -> Result<HealthStatus, DetectionError>;
}
