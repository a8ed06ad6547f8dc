pub mod detection_session;
pub mod download;
pub mod pending_detection;
pub mod session_status;
pub mod webcam_state;
