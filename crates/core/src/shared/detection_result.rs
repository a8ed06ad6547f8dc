use crate::shared::data_url::DataUrl;
use crate::shared::face::Face;

/// What the backend returned for one detection request.
///
/// `faces_detected` is taken verbatim from the backend and is not
/// re-validated against `faces.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub success: bool,
    pub faces_detected: u32,
    /// In detection order, not sorted spatially.
    pub faces: Vec<Face>,
    pub annotated_image: Option<DataUrl>,
    /// Name of the uploaded file, echoed by the upload endpoint only.
    pub original_filename: Option<String>,
    /// Where the backend stored the upload, if it did.
    pub saved_filename: Option<String>,
}

impl DetectionResult {
    pub fn has_annotated_image(&self) -> bool {
        self.annotated_image.is_some()
    }
}
