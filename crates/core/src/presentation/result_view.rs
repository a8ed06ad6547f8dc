use std::fmt;

use crate::session::detection_session::DetectionSession;
use crate::shared::data_url::DataUrl;
use crate::shared::detection_result::DetectionResult;
use crate::shared::face::Face;

/// Everything a front end needs to draw one session, derived from its state.
///
/// Holds no state of its own: project it again after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView<'a> {
    pub loading: bool,
    /// Whether "Detect Faces" may be triggered.
    pub can_detect: bool,
    /// Whether "Capture & Detect" may be triggered.
    pub can_capture: bool,
    pub webcam_active: bool,
    pub error: Option<&'a str>,
    pub preview: Option<&'a DataUrl>,
    pub results: Option<ResultsPanel<'a>>,
}

/// Side-by-side comparison and per-face details of a detection result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel<'a> {
    pub summary: String,
    pub original: Option<&'a DataUrl>,
    pub annotated: Option<&'a DataUrl>,
    pub can_download: bool,
    /// The result predates an in-flight or failed request.
    pub stale: bool,
    pub original_filename: Option<&'a str>,
    pub faces: Vec<FaceCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceCardView {
    pub title: String,
    pub confidence: String,
    pub position: String,
    pub size: String,
}

impl<'a> ResultView<'a> {
    pub fn project(session: &'a DetectionSession) -> Self {
        let loading = session.status().is_loading();
        let webcam_active = session.webcam().is_active();
        Self {
            loading,
            can_detect: session.selected().is_some() && !loading,
            can_capture: webcam_active && !loading,
            webcam_active,
            error: session.status().error(),
            preview: session.preview(),
            results: session.result().map(|result| {
                ResultsPanel::new(result, session.preview(), session.is_result_stale())
            }),
        }
    }
}

impl<'a> ResultsPanel<'a> {
    fn new(result: &'a DetectionResult, original: Option<&'a DataUrl>, stale: bool) -> Self {
        Self {
            summary: summary_text(result.faces_detected),
            original,
            annotated: result.annotated_image.as_ref(),
            can_download: result.has_annotated_image(),
            stale,
            original_filename: result.original_filename.as_deref(),
            faces: result
                .faces
                .iter()
                .enumerate()
                .map(|(i, face)| FaceCardView::new(i, face))
                .collect(),
        }
    }
}

impl FaceCardView {
    /// `index` is zero-based; cards are titled from 1.
    pub fn new(index: usize, face: &Face) -> Self {
        let bbox = &face.bbox;
        Self {
            title: format!("Face {}", index + 1),
            confidence: format!("Confidence: {:.1}%", round_tenth(face.confidence_percent())),
            position: format!("Position: ({}, {})", bbox.x, bbox.y),
            size: format!("Size: {} × {} pixels", bbox.width, bbox.height),
        }
    }
}

/// Rounds half away from zero so exact ties like 56.25 render as 56.3.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn summary_text(faces_detected: u32) -> String {
    let noun = if faces_detected == 1 { "face" } else { "faces" };
    format!("{faces_detected} {noun} detected")
}

impl fmt::Display for ResultsPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        if self.stale {
            write!(f, " (previous result)")?;
        }
        writeln!(f)?;
        if let Some(name) = self.original_filename {
            writeln!(f, "Original: {name}")?;
        }
        for card in &self.faces {
            writeln!(f)?;
            writeln!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Display for FaceCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.confidence)?;
        writeln!(f, "  {}", self.position)?;
        write!(f, "  {}", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::selected_image::ImageFile;
    use crate::capture::infrastructure::synthetic_camera::SyntheticCamera;
    use crate::detection::domain::detection_error::DetectionError;
    use crate::detection::domain::detection_service::{DetectionService, HealthStatus};
    use crate::shared::face::BoundingBox;
    use rstest::rstest;

    struct FixedService(fn() -> Result<DetectionResult, DetectionError>);

    impl DetectionService for FixedService {
        fn detect_file(&self, _: &ImageFile) -> Result<DetectionResult, DetectionError> {
            (self.0)()
        }

        fn detect_data_url(&self, _: &DataUrl) -> Result<DetectionResult, DetectionError> {
            (self.0)()
        }

        fn health(&self) -> Result<HealthStatus, DetectionError> {
            unreachable!()
        }
    }

    fn result_with(faces: Vec<Face>) -> DetectionResult {
        DetectionResult {
            success: true,
            faces_detected: faces.len() as u32,
            faces,
            annotated_image: Some(DataUrl::encode("image/jpeg", b"annotated")),
            original_filename: Some("group.jpg".into()),
            saved_filename: None,
        }
    }

    fn three_faces() -> Result<DetectionResult, DetectionError> {
        Ok(result_with(vec![
            Face::new(BoundingBox::new(120.0, 80.0, 64.0, 64.0), 0.857),
            Face::new(BoundingBox::new(300.0, 90.0, 50.0, 58.0), 0.91),
            Face::new(BoundingBox::new(10.0, 12.0, 30.0, 31.0), 0.5),
        ]))
    }

    fn no_faces() -> Result<DetectionResult, DetectionError> {
        Ok(DetectionResult {
            annotated_image: None,
            ..result_with(Vec::new())
        })
    }

    fn bad_image() -> Result<DetectionResult, DetectionError> {
        Err(DetectionError::Backend {
            status: 400,
            detail: Some("bad image".into()),
        })
    }

    fn session() -> DetectionSession {
        DetectionSession::new(Box::new(SyntheticCamera::new("stub://test", 8, 8)))
    }

    fn detected(service: FixedService) -> DetectionSession {
        let mut session = session();
        session.select_file(ImageFile::new("group.jpg", "image/jpeg", b"jpeg".to_vec()));
        let pending = session.submit_selected_image().unwrap();
        session.complete(pending.execute(&service));
        session
    }

    #[rstest]
    #[case(0, "0 faces detected")]
    #[case(1, "1 face detected")]
    #[case(2, "2 faces detected")]
    #[case(17, "17 faces detected")]
    fn test_summary_text(#[case] count: u32, #[case] expected: &str) {
        assert_eq!(summary_text(count), expected);
    }

    #[rstest]
    #[case(0.857, "Confidence: 85.7%")]
    #[case(1.0, "Confidence: 100.0%")]
    #[case(0.5, "Confidence: 50.0%")]
    #[case(0.8567, "Confidence: 85.7%")]
    #[case(0.5625, "Confidence: 56.3%")]
    #[case(0.8125, "Confidence: 81.3%")]
    fn test_confidence_one_decimal(#[case] confidence: f64, #[case] expected: &str) {
        let face = Face::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), confidence);
        assert_eq!(FaceCardView::new(0, &face).confidence, expected);
    }

    #[test]
    fn test_face_card_lines() {
        let face = Face::new(BoundingBox::new(120.0, 80.0, 64.0, 72.5), 0.857);
        let card = FaceCardView::new(0, &face);
        assert_eq!(card.title, "Face 1");
        assert_eq!(card.position, "Position: (120, 80)");
        assert_eq!(card.size, "Size: 64 × 72.5 pixels");
    }

    #[test]
    fn test_idle_view() {
        let session = session();
        let view = ResultView::project(&session);
        assert!(!view.loading);
        assert!(!view.can_detect);
        assert!(!view.can_capture);
        assert!(view.error.is_none());
        assert!(view.results.is_none());
    }

    #[test]
    fn test_selected_file_enables_detect() {
        let mut session = session();
        session.select_file(ImageFile::new("a.png", "image/png", b"png".to_vec()));
        let view = ResultView::project(&session);
        assert!(view.can_detect);
        assert!(view.preview.is_some());
    }

    #[test]
    fn test_loading_disables_triggers() {
        let mut session = session();
        session.select_file(ImageFile::new("a.png", "image/png", b"png".to_vec()));
        session.start_webcam();
        let _pending = session.submit_selected_image().unwrap();

        let view = ResultView::project(&session);
        assert!(view.loading);
        assert!(view.webcam_active);
        assert!(!view.can_detect);
        assert!(!view.can_capture);
    }

    #[test]
    fn test_success_yields_one_card_per_face() {
        let session = detected(FixedService(three_faces));
        let panel = ResultView::project(&session).results.unwrap();

        assert_eq!(panel.summary, "3 faces detected");
        assert_eq!(panel.faces.len(), 3);
        assert_eq!(panel.faces[0].confidence, "Confidence: 85.7%");
        assert_eq!(panel.faces[2].title, "Face 3");
        assert!(panel.can_download);
        assert!(!panel.stale);
        assert_eq!(panel.original.map(DataUrl::mime_type), Some("image/jpeg"));
    }

    #[test]
    fn test_zero_faces_still_shows_summary() {
        let session = detected(FixedService(no_faces));
        let panel = ResultView::project(&session).results.unwrap();
        assert_eq!(panel.summary, "0 faces detected");
        assert!(panel.faces.is_empty());
        assert!(!panel.can_download);
    }

    #[test]
    fn test_error_banner() {
        let session = detected(FixedService(bad_image));
        let view = ResultView::project(&session);
        assert_eq!(view.error, Some("bad image"));
        assert!(view.results.is_none());
    }

    #[test]
    fn test_result_marked_stale_while_reloading() {
        let mut session = detected(FixedService(three_faces));
        let _pending = session.submit_selected_image().unwrap();
        let panel = ResultView::project(&session).results.unwrap();
        assert!(panel.stale);
        assert_eq!(panel.faces.len(), 3);
    }

    #[test]
    fn test_panel_text_rendering() {
        let session = detected(FixedService(three_faces));
        let text = ResultView::project(&session).results.unwrap().to_string();
        assert!(text.starts_with("3 faces detected\nOriginal: group.jpg\n"));
        assert!(text.contains(
            "Face 1\n  Confidence: 85.7%\n  Position: (120, 80)\n  Size: 64 × 64 pixels\n"
        ));
    }
}
