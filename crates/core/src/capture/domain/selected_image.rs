use std::sync::Arc;

use crate::shared::data_url::DataUrl;

/// Raw bytes of a user-chosen image file plus what the upload needs to name it.
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    file_name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_data_url(&self) -> DataUrl {
        DataUrl::encode(&self.mime_type, &self.bytes)
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The image the next detection will be run on.
///
/// Replaced wholesale on every selection or capture, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectedImage {
    /// Picked from disk; uploaded as multipart.
    File(ImageFile),
    /// Grabbed from the webcam; sent as a base64 data URL.
    Captured(DataUrl),
}

impl SelectedImage {
    pub fn preview(&self) -> DataUrl {
        match self {
            SelectedImage::File(file) => file.to_data_url(),
            SelectedImage::Captured(url) => url.clone(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SelectedImage::File(file) => file.file_name(),
            SelectedImage::Captured(_) => "webcam capture",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_preview_is_data_url_of_bytes() {
        let file = ImageFile::new("a.png", "image/png", b"abc".to_vec());
        let preview = SelectedImage::File(file).preview();
        assert_eq!(preview.as_str(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_captured_preview_is_the_capture() {
        let url = DataUrl::encode("image/jpeg", b"frame");
        let selected = SelectedImage::Captured(url.clone());
        assert_eq!(selected.preview(), url);
        assert_eq!(selected.label(), "webcam capture");
    }
}
