use crate::capture::domain::selected_image::SelectedImage;
use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::detection_service::DetectionService;
use crate::shared::detection_result::DetectionResult;

/// Identifies one detection request issued by a session.
///
/// Tokens increase monotonically; only the newest one may update state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub(super) u64);

/// A detection request that has been started but not yet sent.
///
/// Holds everything the HTTP call needs, so it can be moved to a worker
/// thread while the session stays on the UI thread.
#[derive(Debug)]
pub struct PendingDetection {
    token: RequestToken,
    image: SelectedImage,
}

impl PendingDetection {
    pub(super) fn new(token: RequestToken, image: SelectedImage) -> Self {
        Self { token, image }
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    /// Sends the request: multipart for files, base64 JSON for captures.
    pub fn execute(self, service: &dyn DetectionService) -> DetectionOutcome {
        log::debug!("Executing detection {:?} for {}", self.token, self.image.label());
        let result = match &self.image {
            SelectedImage::File(file) => service.detect_file(file),
            SelectedImage::Captured(url) => service.detect_data_url(url),
        };
        DetectionOutcome {
            token: self.token,
            image: self.image,
            result,
        }
    }

    /// Settles the request without sending it, e.g. when no client could be built.
    pub fn reject(self, error: DetectionError) -> DetectionOutcome {
        DetectionOutcome {
            token: self.token,
            image: self.image,
            result: Err(error),
        }
    }
}

/// The settled result of a [`PendingDetection`], ready to hand back to the session.
#[derive(Debug)]
pub struct DetectionOutcome {
    pub(super) token: RequestToken,
    pub(super) image: SelectedImage,
    pub(super) result: Result<DetectionResult, DetectionError>,
}

impl DetectionOutcome {
    pub fn token(&self) -> RequestToken {
        self.token
    }
}
