pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const BACKEND_URL_ENV: &str = "FACELENS_BACKEND_URL";

pub const DETECT_UPLOAD_PATH: &str = "/detect-faces";
pub const DETECT_BASE64_PATH: &str = "/detect-faces-base64";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field name the upload endpoint reads the image from.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Filename used when saving the annotated result.
pub const ANNOTATED_DOWNLOAD_FILENAME: &str = "face-detection-result.jpg";

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the image";
pub const WEBCAM_ERROR_MESSAGE: &str = "Unable to access webcam";

/// Matches the default quality browsers use for `image/jpeg` canvas exports.
pub const CAPTURE_JPEG_QUALITY: u8 = 92;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif", "webp"];

pub const SYNTHETIC_CAMERA_SCHEME: &str = "stub://";
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
