pub mod action_button;
pub mod face_card;
pub mod file_row;
pub mod image_pane;
