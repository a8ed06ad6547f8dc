use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use facelens_core::capture::domain::camera::{Camera, CameraStream};
use facelens_core::capture::domain::capture_error::CaptureError;
use facelens_core::shared::frame::Frame;

const OPEN_TIMEOUT: Duration = Duration::from_secs(5);
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

type FrameResult = Result<Frame, CaptureError>;

/// Reads a camera on its own thread so a stalled device never blocks the UI.
///
/// The stream is opened and read on the worker thread. Frames arrive over a
/// one-slot channel, so the worker reads at most one frame ahead of the UI.
pub struct BackgroundCamera {
    inner: Arc<Mutex<Box<dyn Camera + Send>>>,
    device: String,
}

impl BackgroundCamera {
    pub fn new(inner: Box<dyn Camera + Send>) -> Self {
        let device = inner.device().to_string();
        Self {
            inner: Arc::new(Mutex::new(inner)),
            device,
        }
    }

    fn unavailable(&self, reason: &str) -> CaptureError {
        CaptureError::Unavailable {
            device: self.device.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Camera for BackgroundCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), CaptureError>>(1);
        let (frames_tx, frames_rx) = crossbeam_channel::bounded::<FrameResult>(1);
        let stopped = Arc::new(AtomicBool::new(false));

        let inner = self.inner.clone();
        let stopped_clone = stopped.clone();
        let device = self.device.clone();
        thread::spawn(move || {
            let opened = match inner.lock() {
                Ok(mut camera) => camera.open(),
                Err(_) => Err(CaptureError::Unavailable {
                    device: device.clone(),
                    reason: "camera worker panicked".into(),
                }),
            };
            match opened {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    pump_frames(stream, &frames_tx, &stopped_clone, &device);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Box::new(BackgroundStream {
                frames: frames_rx,
                stopped,
                device: self.device.clone(),
            })),
            Ok(Err(e)) => Err(e),
            Err(RecvTimeoutError::Timeout) => {
                stopped.store(true, Ordering::Relaxed);
                Err(self.unavailable("timed out opening the device"))
            }
            Err(RecvTimeoutError::Disconnected) => Err(self.unavailable("camera worker exited")),
        }
    }

    fn device(&self) -> &str {
        &self.device
    }
}

fn pump_frames(
    mut stream: Box<dyn CameraStream>,
    tx: &Sender<FrameResult>,
    stopped: &AtomicBool,
    device: &str,
) {
    while !stopped.load(Ordering::Relaxed) {
        let frame = match stream.next_frame() {
            Err(CaptureError::Stopped) => break,
            other => other,
        };
        // Blocks while the slot is full, pacing reads to the UI's polling.
        if tx.send(frame).is_err() {
            break;
        }
    }
    stream.stop();
    log::debug!("Camera worker for {device} exited");
}

/// Receiving end of a [`BackgroundCamera`].
pub struct BackgroundStream {
    frames: Receiver<FrameResult>,
    stopped: Arc<AtomicBool>,
    device: String,
}

impl CameraStream for BackgroundStream {
    fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.is_stopped() {
            return Err(CaptureError::Stopped);
        }
        match self.frames.recv_timeout(FRAME_TIMEOUT) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => Err(CaptureError::Unavailable {
                device: self.device.clone(),
                reason: format!("no frame within {}s", FRAME_TIMEOUT.as_secs()),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(CaptureError::Stopped),
        }
    }

    fn try_next_frame(&mut self) -> Option<Result<Frame, CaptureError>> {
        if self.is_stopped() {
            return Some(Err(CaptureError::Stopped));
        }
        match self.frames.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CaptureError::Stopped)),
        }
    }

    /// Signals the worker, which releases the device after its current read.
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

impl Drop for BackgroundStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use facelens_core::capture::infrastructure::camera_factory::create_camera;
    use facelens_core::session::detection_session::DetectionSession;
    use facelens_core::shared::constants::WEBCAM_ERROR_MESSAGE;

    /// A device whose reads hang until the test releases them.
    struct HangingCamera {
        release: Receiver<()>,
    }

    impl Camera for HangingCamera {
        fn open(&mut self) -> Result<Box<dyn CameraStream>, CaptureError> {
            Ok(Box::new(HangingStream {
                release: self.release.clone(),
            }))
        }

        fn device(&self) -> &str {
            "hanging"
        }
    }

    struct HangingStream {
        release: Receiver<()>,
    }

    impl CameraStream for HangingStream {
        fn next_frame(&mut self) -> Result<Frame, CaptureError> {
            let _ = self.release.recv();
            Err(CaptureError::Stopped)
        }

        fn stop(&mut self) {}

        fn is_stopped(&self) -> bool {
            false
        }
    }

    fn wait_for_frame(stream: &mut dyn CameraStream) -> Frame {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(frame) = stream.try_next_frame() {
                return frame.unwrap();
            }
            assert!(Instant::now() < deadline, "no frame arrived");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_frames_arrive_from_worker_thread() {
        let mut camera = BackgroundCamera::new(create_camera("stub://background"));
        let mut stream = camera.open().ok().unwrap();
        let frame = wait_for_frame(stream.as_mut());
        assert_eq!((frame.width(), frame.height()), (640, 480));

        stream.stop();
        assert!(stream.is_stopped());
        assert!(matches!(stream.next_frame(), Err(CaptureError::Stopped)));
    }

    #[test]
    fn test_denied_device_fails_to_open() {
        let mut camera = BackgroundCamera::new(create_camera("stub://denied"));
        let err = camera.open().err().unwrap();
        assert!(matches!(err, CaptureError::PermissionDenied { .. }));
    }

    #[test]
    fn test_hanging_device_does_not_block_refresh() {
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        let mut session = DetectionSession::new(Box::new(BackgroundCamera::new(Box::new(
            HangingCamera {
                release: release_rx,
            },
        ))));
        assert!(session.start_webcam());

        let started = Instant::now();
        assert!(session.refresh_webcam_sink().is_none());
        assert!(started.elapsed() < Duration::from_millis(500));

        // Capturing waits at most one frame timeout, then reports the webcam error.
        assert!(session.capture_and_submit().is_none());
        assert_eq!(session.status().error(), Some(WEBCAM_ERROR_MESSAGE));

        session.stop_webcam();
        drop(release_tx);
    }
}
