pub mod backend_config;
pub mod constants;
pub mod data_url;
pub mod detection_result;
pub mod face;
pub mod frame;
