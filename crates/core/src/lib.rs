//! Docmatch Core Library
//!
//! Foundational utilities shared by every docmatch crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Layered configuration (`AppConfig`, `RetrievalConfig`)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, RetrievalConfig};
pub use error::{AppError, AppResult};
