pub mod camera;
pub mod capture_error;
pub mod selected_image;
