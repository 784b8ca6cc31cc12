pub mod display;
pub mod measurement;
pub mod palette;
pub mod session;
pub mod theme;
pub mod upload_set;
