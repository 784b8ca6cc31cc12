pub mod cleaner;
pub mod error;
pub mod export;
pub mod loader;
