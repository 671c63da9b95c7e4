pub mod analysis;
pub mod classifier;
pub mod config;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::{MoodlensError, Result};
