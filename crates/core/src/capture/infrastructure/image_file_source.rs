use std::fs;
use std::path::Path;

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::selected_image::ImageFile;

/// Reads a user-chosen file into an [`ImageFile`].
///
/// Content is not validated; a file that isn't really an image is only
/// rejected once the backend tries to decode it.
pub struct ImageFileSource;

impl ImageFileSource {
    pub fn read(path: &Path) -> Result<ImageFile, CaptureError> {
        let bytes = fs::read(path).map_err(|e| CaptureError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        log::debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(ImageFile::new(file_name, mime_type_for(path), bytes))
    }
}

/// MIME type guessed from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
