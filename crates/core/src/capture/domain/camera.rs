use crate::capture::domain::capture_error::CaptureError;
use crate::shared::frame::Frame;

/// A camera that can be asked for a live stream.
///
/// Opening is the permission/availability checkpoint: a denied or missing
/// device fails here, before any stream exists.
pub trait Camera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError>;

    /// Human-readable device identifier, e.g. `/dev/video0`.
    fn device(&self) -> &str;
}

/// A live video stream. Exclusively owned by whoever opened it.
pub trait CameraStream {
    /// Blocks until the next frame is available, at the stream's native size.
    fn next_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Returns a frame only if one is ready, `None` otherwise. Streams that
    /// read synchronously just read.
    fn try_next_frame(&mut self) -> Option<Result<Frame, CaptureError>> {
        Some(self.next_frame())
    }

    /// Releases the device. Must be safe to call more than once.
    fn stop(&mut self);

    fn is_stopped(&self) -> bool;
}
