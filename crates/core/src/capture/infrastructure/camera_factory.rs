use crate::capture::domain::camera::{Camera, CameraStream};
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::infrastructure::synthetic_camera::SyntheticCamera;
use crate::shared::constants::SYNTHETIC_CAMERA_SCHEME;

const SYNTHETIC_WIDTH: u32 = 640;
const SYNTHETIC_HEIGHT: u32 = 480;

/// Picks a camera implementation for a device string.
///
/// `stub://...` devices are synthetic. Anything else is a V4L2 device node
/// when built with `webcam-v4l2`, and unavailable otherwise.
pub fn create_camera(device: &str) -> Box<dyn Camera + Send> {
    if device.starts_with(SYNTHETIC_CAMERA_SCHEME) {
        return Box::new(SyntheticCamera::new(
            device,
            SYNTHETIC_WIDTH,
            SYNTHETIC_HEIGHT,
        ));
    }

    #[cfg(feature = "webcam-v4l2")]
    {
        Box::new(super::v4l2_camera::V4l2Camera::new(device))
    }
    #[cfg(not(feature = "webcam-v4l2"))]
    {
        Box::new(UnsupportedCamera {
            device: device.to_string(),
        })
    }
}

/// Stand-in used when no capture backend was compiled in.
#[cfg_attr(feature = "webcam-v4l2", allow(dead_code))]
struct UnsupportedCamera {
    device: String,
}

impl Camera for UnsupportedCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError> {
        Err(CaptureError::Unavailable {
            device: self.device.clone(),
            reason: "built without webcam support (enable the webcam-v4l2 feature)".into(),
        })
    }

    fn device(&self) -> &str {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_device_opens_synthetic_stream() {
        let mut camera = create_camera("stub://cam");
        assert_eq!(camera.device(), "stub://cam");
        let mut stream = camera.open().ok().unwrap();
        let frame = stream.next_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[cfg(not(feature = "webcam-v4l2"))]
    #[test]
    fn test_real_device_without_backend_is_unavailable() {
        let mut camera = create_camera("/dev/video0");
        let err = camera.open().err().unwrap();
        assert!(matches!(err, CaptureError::Unavailable { .. }));
    }
}
