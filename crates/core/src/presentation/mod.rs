pub mod result_view;
