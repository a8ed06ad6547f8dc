pub mod camera_factory;
pub mod image_file_source;
pub mod jpeg_encoder;
pub mod synthetic_camera;
#[cfg(feature = "webcam-v4l2")]
pub mod v4l2_camera;
