use crate::shared::detection_result::DetectionResult;

/// What the session is doing right now. Exactly one state at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Success(DetectionResult),
    Error(String),
}

impl SessionStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        match self {
            SessionStatus::Success(result) => Some(result),
            _ => None,
        }
    }
}
