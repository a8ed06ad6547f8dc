use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use facelens_core::capture::infrastructure::camera_factory::create_camera;
use facelens_core::capture::infrastructure::image_file_source::ImageFileSource;
use facelens_core::detection::domain::detection_service::DetectionService;
use facelens_core::detection::infrastructure::http_detection_service::HttpDetectionService;
use facelens_core::presentation::result_view::ResultView;
use facelens_core::session::detection_session::DetectionSession;
use facelens_core::session::download::{DirectoryDownloadSink, DownloadSink};
use facelens_core::shared::backend_config::BackendConfig;
use facelens_core::shared::constants::{
    BACKEND_URL_ENV, DEFAULT_BACKEND_URL, DEFAULT_CAMERA_DEVICE,
};

/// Submit images to a face detection backend and print what it found.
#[derive(Parser)]
#[command(name = "facelens")]
struct Cli {
    /// Base URL of the detection backend.
    #[arg(long, env = BACKEND_URL_ENV, default_value = DEFAULT_BACKEND_URL, global = true)]
    backend_url: String,

    /// Abort requests after this many seconds (no timeout by default).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an image file for detection.
    Detect {
        /// Image file to upload.
        input: PathBuf,

        /// Save the annotated image to DIR (downloads folder if DIR is omitted).
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        save_annotated: Option<Option<PathBuf>>,
    },
    /// Grab one webcam frame and send it for detection.
    Capture {
        /// Camera device, or stub://NAME for a synthetic camera.
        #[arg(long, default_value = DEFAULT_CAMERA_DEVICE)]
        device: String,

        /// Frames to discard before capturing, letting exposure settle.
        #[arg(long, default_value = "5")]
        warmup_frames: usize,

        /// Save the annotated image to DIR (downloads folder if DIR is omitted).
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        save_annotated: Option<Option<PathBuf>>,
    },
    /// Check that the backend is up.
    Health,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = BackendConfig::new(&cli.backend_url)
        .with_timeout(cli.timeout_secs.map(Duration::from_secs));
    log::info!("Using backend {}", config.base_url());
    let service = HttpDetectionService::new(config)?;

    match cli.command {
        Command::Detect {
            input,
            save_annotated,
        } => {
            let mut session = DetectionSession::new(create_camera(DEFAULT_CAMERA_DEVICE));
            run_detect(&mut session, &service, &input)?;
            report(&mut session, save_annotated)
        }
        Command::Capture {
            device,
            warmup_frames,
            save_annotated,
        } => {
            let mut session = DetectionSession::new(create_camera(&device));
            run_capture(&mut session, &service, warmup_frames)?;
            report(&mut session, save_annotated)
        }
        Command::Health => run_health(&service),
    }
}

fn run_detect(
    session: &mut DetectionSession,
    service: &dyn DetectionService,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match ImageFileSource::read(input) {
        Ok(file) => session.select_file(file),
        Err(e) => session.reject_file(&e),
    }
    if let Some(pending) = session.submit_selected_image() {
        eprintln!("Detecting faces in {}...", input.display());
        session.complete(pending.execute(service));
    }
    Ok(())
}

fn run_capture(
    session: &mut DetectionSession,
    service: &dyn DetectionService,
    warmup_frames: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.start_webcam() {
        for _ in 0..warmup_frames {
            session.refresh_webcam_sink();
        }
        if let Some(pending) = session.capture_and_submit() {
            eprintln!("Detecting faces in frame from {}...", session.camera_device());
            session.complete(pending.execute(service));
        }
    }
    session.stop_webcam();
    Ok(())
}

/// Prints the session's result, then optionally saves the annotated image.
fn report(
    session: &mut DetectionSession,
    save_annotated: Option<Option<PathBuf>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let has_annotated = {
        let view = ResultView::project(session);
        if let Some(message) = view.error {
            return Err(message.into());
        }
        let Some(panel) = view.results else {
            return Err("no detection was run".into());
        };
        print!("{panel}");
        panel.can_download
    };

    let Some(dir) = save_annotated else {
        return Ok(());
    };
    if !has_annotated {
        log::warn!("Backend returned no annotated image; nothing to save");
        return Ok(());
    }
    let sink = match dir {
        Some(dir) => DirectoryDownloadSink::new(dir),
        None => DirectoryDownloadSink::user_downloads()?,
    };
    save(session, &sink)
}

fn save(
    session: &mut DetectionSession,
    sink: &dyn DownloadSink,
) -> Result<(), Box<dyn std::error::Error>> {
    match session.download_annotated_result(sink) {
        Some(path) => {
            println!("Annotated image saved to {}", path.display());
            Ok(())
        }
        None => Err(session
            .status()
            .error()
            .unwrap_or("annotated image could not be saved")
            .into()),
    }
}

fn run_health(service: &dyn DetectionService) -> Result<(), Box<dyn std::error::Error>> {
    let health = service.health()?;
    match &health.timestamp {
        Some(ts) => println!("Backend status: {} ({ts})", health.status),
        None => println!("Backend status: {}", health.status),
    }
    if !health.is_healthy() {
        return Err(format!("backend reported status '{}'", health.status).into());
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.backend_url.trim().is_empty() {
        return Err("Backend URL must not be empty".into());
    }
    if cli.timeout_secs == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_core::capture::domain::selected_image::ImageFile;
    use facelens_core::detection::domain::detection_error::DetectionError;
    use facelens_core::detection::domain::detection_service::HealthStatus;
    use facelens_core::shared::data_url::DataUrl;
    use facelens_core::shared::detection_result::DetectionResult;
    use facelens_core::shared::face::{BoundingBox, Face};
    use rstest::rstest;

    struct CannedService {
        result: Result<DetectionResult, (u16, Option<&'static str>)>,
        health: &'static str,
    }

    impl CannedService {
        fn ok() -> Self {
            Self {
                result: Ok(DetectionResult {
                    success: true,
                    faces_detected: 1,
                    faces: vec![Face::new(BoundingBox::new(4.0, 6.0, 10.0, 12.0), 0.9)],
                    annotated_image: Some(DataUrl::encode("image/jpeg", b"marked")),
                    original_filename: None,
                    saved_filename: None,
                }),
                health: "healthy",
            }
        }

        fn reply(&self) -> Result<DetectionResult, DetectionError> {
            self.result.clone().map_err(|(status, detail)| DetectionError::Backend {
                status,
                detail: detail.map(str::to_string),
            })
        }
    }

    impl DetectionService for CannedService {
        fn detect_file(&self, _: &ImageFile) -> Result<DetectionResult, DetectionError> {
            self.reply()
        }

        fn detect_data_url(&self, _: &DataUrl) -> Result<DetectionResult, DetectionError> {
            self.reply()
        }

        fn health(&self) -> Result<HealthStatus, DetectionError> {
            Ok(HealthStatus {
                status: self.health.to_string(),
                timestamp: None,
            })
        }
    }

    fn stub_session() -> DetectionSession {
        DetectionSession::new(create_camera("stub://cli"))
    }

    #[rstest]
    #[case(&["facelens", "health"])]
    #[case(&["facelens", "detect", "a.jpg"])]
    #[case(&["facelens", "detect", "a.jpg", "--save-annotated"])]
    #[case(&["facelens", "detect", "a.jpg", "--save-annotated", "out"])]
    #[case(&["facelens", "capture", "--device", "stub://x", "--timeout-secs", "3"])]
    fn test_accepts_valid_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_save_annotated_without_dir_means_downloads() {
        let cli = Cli::try_parse_from(["facelens", "detect", "a.jpg", "--save-annotated"]).unwrap();
        match cli.command {
            Command::Detect { save_annotated, .. } => assert_eq!(save_annotated, Some(None)),
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let cli = Cli::try_parse_from(["facelens", "--timeout-secs", "0", "health"]).unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_detect_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("face.png");
        std::fs::write(&input, b"png").unwrap();
        let mut session = stub_session();

        run_detect(&mut session, &CannedService::ok(), &input).unwrap();
        report(&mut session, Some(Some(dir.path().join("out")))).unwrap();

        let saved = std::fs::read(dir.path().join("out/face-detection-result.jpg")).unwrap();
        assert_eq!(saved, b"marked");
    }

    #[test]
    fn test_detect_missing_file_reports_error() {
        let mut session = stub_session();
        run_detect(&mut session, &CannedService::ok(), Path::new("/no/such/face.png")).unwrap();
        assert!(report(&mut session, None).is_err());
    }

    #[test]
    fn test_backend_detail_becomes_cli_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("face.png");
        std::fs::write(&input, b"png").unwrap();
        let service = CannedService {
            result: Err((400, Some("bad image"))),
            ..CannedService::ok()
        };
        let mut session = stub_session();

        run_detect(&mut session, &service, &input).unwrap();
        let err = report(&mut session, None).unwrap_err();
        assert_eq!(err.to_string(), "bad image");
    }

    #[test]
    fn test_capture_from_synthetic_camera() {
        let mut session = stub_session();
        run_capture(&mut session, &CannedService::ok(), 2).unwrap();
        assert!(!session.webcam().is_active());
        assert!(report(&mut session, None).is_ok());
    }

    #[test]
    fn test_capture_denied_camera_reports_webcam_error() {
        let mut session = DetectionSession::new(create_camera("stub://denied"));
        run_capture(&mut session, &CannedService::ok(), 0).unwrap();
        let err = report(&mut session, None).unwrap_err();
        assert_eq!(err.to_string(), "Unable to access webcam");
    }

    #[test]
    fn test_unhealthy_backend_is_an_error() {
        let service = CannedService {
            health: "degraded",
            ..CannedService::ok()
        };
        assert!(run_health(&service).is_err());
        assert!(run_health(&CannedService::ok()).is_ok());
    }
}
