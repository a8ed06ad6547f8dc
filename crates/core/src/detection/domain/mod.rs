pub mod detection_error;
pub mod detection_service;
