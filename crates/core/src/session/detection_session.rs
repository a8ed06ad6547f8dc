use std::mem;
use std::path::PathBuf;

use crate::capture::domain::camera::Camera;
use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::selected_image::{ImageFile, SelectedImage};
use crate::capture::infrastructure::jpeg_encoder;
use crate::session::download::{DownloadError, DownloadSink};
use crate::session::pending_detection::{DetectionOutcome, PendingDetection, RequestToken};
use crate::session::session_status::SessionStatus;
use crate::session::webcam_state::{ActiveWebcam, WebcamState};
use crate::shared::constants::ANNOTATED_DOWNLOAD_FILENAME;
use crate::shared::data_url::DataUrl;
use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Owns all state of one detection session and mediates between the
/// capture sources, the backend and whatever renders the result.
///
/// Network calls are split in two: `submit_selected_image` /
/// `capture_and_submit` return a [`PendingDetection`] to run elsewhere, and
/// [`complete`](Self::complete) applies its outcome. Outcomes of anything
/// but the most recently issued request are discarded.
pub struct DetectionSession {
    camera: Box<dyn Camera>,
    selected: Option<SelectedImage>,
    preview: Option<DataUrl>,
    status: SessionStatus,
    /// Last successful result while `status` is Loading or Error.
    retained: Option<DetectionResult>,
    webcam: WebcamState,
    last_issued: u64,
    /// Error raised while a request was in flight, shown once it settles.
    deferred_error: Option<String>,
}

impl DetectionSession {
    pub fn new(camera: Box<dyn Camera>) -> Self {
        Self {
            camera,
            selected: None,
            preview: None,
            status: SessionStatus::Idle,
            retained: None,
            webcam: WebcamState::Inactive,
            last_issued: 0,
            deferred_error: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&DataUrl> {
        self.preview.as_ref()
    }

    /// The result to display: the current one, or the last one while a new
    /// request is loading or has failed.
    pub fn result(&self) -> Option<&DetectionResult> {
        self.status.result().or(self.retained.as_ref())
    }

    pub fn is_result_stale(&self) -> bool {
        self.status.result().is_none() && self.retained.is_some()
    }

    pub fn webcam(&self) -> &WebcamState {
        &self.webcam
    }

    pub fn camera_device(&self) -> &str {
        self.camera.device()
    }

    /// Swaps the camera, releasing any stream from the old one first.
    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        self.stop_webcam();
        self.camera = camera;
    }

    /// Makes `file` the current image and derives its preview.
    ///
    /// Clears an error but keeps the previous result on screen until a new
    /// detection completes.
    pub fn select_file(&mut self, file: ImageFile) {
        log::info!("Selected {} ({})", file.file_name(), file.mime_type());
        let image = SelectedImage::File(file);
        self.preview = Some(image.preview());
        self.selected = Some(image);
        self.deferred_error = None;
        if let SessionStatus::Error(_) = self.status {
            self.status = self
                .retained
                .take()
                .map_or(SessionStatus::Idle, SessionStatus::Success);
        }
    }

    /// Reports a file that could not be read as the current error.
    pub fn reject_file(&mut self, err: &CaptureError) {
        log::warn!("Could not load selected file: {err}");
        self.fail(err.user_message());
    }

    /// Starts a detection of the current image, or `None` if nothing is selected.
    pub fn submit_selected_image(&mut self) -> Option<PendingDetection> {
        let image = self.selected.clone()?;
        Some(self.begin(image))
    }

    /// Opens the camera. On failure the webcam state is left as it was.
    pub fn start_webcam(&mut self) -> bool {
        if self.webcam.is_active() {
            return true;
        }
        match self.camera.open() {
            Ok(stream) => {
                log::info!("Webcam {} started", self.camera.device());
                self.webcam = WebcamState::Active(ActiveWebcam::new(stream));
                true
            }
            Err(err) => {
                log::warn!("Webcam {} failed to start: {err}", self.camera.device());
                self.fail(err.user_message());
                false
            }
        }
    }

    /// Stops every track of the live stream and detaches the sink. Idempotent.
    pub fn stop_webcam(&mut self) {
        if let WebcamState::Active(mut active) = mem::take(&mut self.webcam) {
            active.stream.stop();
            log::info!("Webcam {} stopped", self.camera.device());
        }
    }

    /// Moves the newest ready frame into the video sink for display. Keeps
    /// the previous frame when the stream has nothing new yet.
    pub fn refresh_webcam_sink(&mut self) -> Option<&Frame> {
        if let WebcamState::Active(active) = &mut self.webcam {
            match active.stream.try_next_frame() {
                Some(Ok(frame)) => active.sink = Some(frame),
                Some(Err(err)) => log::warn!("Dropped live frame: {err}"),
                None => {}
            }
        }
        self.webcam.live_frame()
    }

    /// Grabs one frame and starts a detection on it, or `None` when the
    /// webcam is not running or the frame could not be captured.
    ///
    /// Prefers a freshly ready frame, then the one on display, and only
    /// waits on the stream when neither exists.
    pub fn capture_and_submit(&mut self) -> Option<PendingDetection> {
        let WebcamState::Active(active) = &mut self.webcam else {
            return None;
        };
        let frame = match active.stream.try_next_frame() {
            Some(frame) => frame,
            None => match active.sink.clone() {
                Some(shown) => Ok(shown),
                None => active.stream.next_frame(),
            },
        };
        let captured = frame.and_then(|frame| {
            let url = jpeg_encoder::encode_frame(&frame)?;
            active.sink = Some(frame);
            Ok(url)
        });

        match captured {
            Ok(url) => Some(self.begin(SelectedImage::Captured(url))),
            Err(err) => {
                log::warn!("Webcam capture failed: {err}");
                self.fail(err.user_message());
                None
            }
        }
    }

    /// Applies a settled request. Returns `false` if it was superseded by a
    /// newer request and therefore ignored.
    pub fn complete(&mut self, outcome: DetectionOutcome) -> bool {
        if outcome.token != RequestToken(self.last_issued) {
            log::warn!(
                "Discarding stale response {:?} (latest is {})",
                outcome.token,
                self.last_issued
            );
            return false;
        }

        match outcome.result {
            Ok(result) => {
                log::info!(
                    "Detection {:?} succeeded: {} face(s)",
                    outcome.token,
                    result.faces_detected
                );
                if let SelectedImage::Captured(_) = outcome.image {
                    self.preview = Some(outcome.image.preview());
                    self.selected = Some(outcome.image);
                }
                self.retained = None;
                self.status = SessionStatus::Success(result);
            }
            Err(err) => {
                log::warn!("Detection {:?} failed: {err}", outcome.token);
                self.deferred_error = None;
                self.transition(SessionStatus::Error(err.user_message()));
            }
        }
        if let Some(message) = self.deferred_error.take() {
            self.transition(SessionStatus::Error(message));
        }
        true
    }

    /// Saves the annotated image as `face-detection-result.jpg`.
    ///
    /// Does nothing without a result carrying an annotated image.
    pub fn download_annotated_result(&mut self, sink: &dyn DownloadSink) -> Option<PathBuf> {
        let annotated = self.result()?.annotated_image.as_ref()?;
        let saved = annotated
            .decode()
            .map_err(DownloadError::from)
            .and_then(|bytes| sink.save(ANNOTATED_DOWNLOAD_FILENAME, &bytes));

        match saved {
            Ok(path) => {
                log::info!("Annotated result saved to {}", path.display());
                Some(path)
            }
            Err(err) => {
                log::warn!("Saving annotated result failed: {err}");
                self.fail(err.to_string());
                None
            }
        }
    }

    fn begin(&mut self, image: SelectedImage) -> PendingDetection {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        log::info!("Detection {token:?} started for {}", image.label());
        self.transition(SessionStatus::Loading);
        PendingDetection::new(token, image)
    }

    /// Shows `message` now, or after the in-flight request settles so the
    /// triggers stay disabled until then.
    fn fail(&mut self, message: String) {
        if self.status.is_loading() {
            log::debug!("Deferring error until the pending request settles: {message}");
            self.deferred_error = Some(message);
        } else {
            self.transition(SessionStatus::Error(message));
        }
    }

    fn transition(&mut self, next: SessionStatus) {
        if let SessionStatus::Success(previous) = mem::replace(&mut self.status, next) {
            self.retained = Some(previous);
        }
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        self.stop_webcam();
    }
}
