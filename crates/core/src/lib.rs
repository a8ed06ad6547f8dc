pub mod capture;
pub mod detection;
pub mod presentation;
pub mod session;
pub mod shared;
