pub mod detection_worker;
pub mod health_worker;
pub mod webcam_worker;
