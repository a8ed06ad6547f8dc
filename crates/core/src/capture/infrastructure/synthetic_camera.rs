use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::domain::camera::{Camera, CameraStream};
use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

/// Camera for `stub://` devices: yields a moving gradient instead of video.
///
/// `stub://denied` simulates a refused permission prompt.
pub struct SyntheticCamera {
    device: String,
    width: u32,
    height: u32,
    last_stopped: Option<Arc<AtomicBool>>,
}

impl SyntheticCamera {
    pub fn new(device: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            device: device.into(),
            width,
            height,
            last_stopped: None,
        }
    }

    /// Whether the most recently opened stream has been stopped.
    pub fn last_stream_stopped(&self) -> Option<bool> {
        self.last_stopped
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Camera for SyntheticCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError> {
        if self.device.ends_with("denied") {
            return Err(CaptureError::PermissionDenied {
                device: self.device.clone(),
            });
        }
        let stopped = Arc::new(AtomicBool::new(false));
        self.last_stopped = Some(stopped.clone());
        log::info!(
            "SyntheticCamera: opened {} ({}x{})",
            self.device,
            self.width,
            self.height
        );
        Ok(Box::new(SyntheticStream {
            width: self.width,
            height: self.height,
            frame_count: 0,
            stopped,
        }))
    }

    fn device(&self) -> &str {
        &self.device
    }
}

struct SyntheticStream {
    width: u32,
    height: u32,
    frame_count: u64,
    stopped: Arc<AtomicBool>,
}

impl CameraStream for SyntheticStream {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.is_stopped() {
            return Err(CaptureError::Stopped);
        }
        let shift = (self.frame_count % 256) as u32;
        let mut data = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(((x + shift) % 256) as u8);
                data.push(((y + shift) % 256) as u8);
                data.push(128);
            }
        }
        let frame = Frame::new(data, self.width, self.height, self.frame_count);
        self.frame_count += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_have_configured_size_and_advance() {
        let mut camera = SyntheticCamera::new("stub://test", 32, 24);
        let mut stream = camera.open().unwrap();
        let first = stream.next_frame().unwrap();
        let second = stream.next_frame().unwrap();
        assert_eq!((first.width(), first.height()), (32, 24));
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_ne!(first.data(), second.data());
    }

    #[test]
    fn test_stopped_stream_yields_no_frames() {
        let mut camera = SyntheticCamera::new("stub://test", 8, 8);
        let mut stream = camera.open().unwrap();
        stream.stop();
        stream.stop();
        assert!(stream.is_stopped());
        assert!(matches!(stream.next_frame(), Err(CaptureError::Stopped)));
        assert_eq!(camera.last_stream_stopped(), Some(true));
    }

    #[test]
    fn test_denied_device_refuses_to_open() {
        let mut camera = SyntheticCamera::new("stub://denied", 8, 8);
        let err = camera.open().err().unwrap();
        assert!(matches!(err, CaptureError::PermissionDenied { .. }));
        assert!(camera.last_stream_stopped().is_none());
    }
}
