use crate::capture::domain::camera::CameraStream;
use crate::shared::frame::Frame;

/// Webcam lifecycle. `Active` owns the live stream exclusively.
#[derive(Default)]
pub enum WebcamState {
    #[default]
    Inactive,
    Active(ActiveWebcam),
}

pub struct ActiveWebcam {
    pub(super) stream: Box<dyn CameraStream>,
    /// Most recent frame pulled for live display.
    pub(super) sink: Option<Frame>,
}

impl ActiveWebcam {
    pub(super) fn new(stream: Box<dyn CameraStream>) -> Self {
        Self { stream, sink: None }
    }

    pub fn live_frame(&self) -> Option<&Frame> {
        self.sink.as_ref()
    }
}

impl WebcamState {
    pub fn is_active(&self) -> bool {
        matches!(self, WebcamState::Active(_))
    }

    pub fn live_frame(&self) -> Option<&Frame> {
        match self {
            WebcamState::Active(active) => active.live_frame(),
            WebcamState::Inactive => None,
        }
    }
}

impl std::fmt::Debug for WebcamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebcamState::Inactive => write!(f, "Inactive"),
            WebcamState::Active(active) => write!(
                f,
                "Active(sink: {})",
                active.sink.as_ref().map_or("empty".to_string(), |fr| format!(
                    "{}x{} #{}",
                    fr.width(),
                    fr.height(),
                    fr.index()
                ))
            ),
        }
    }
}
