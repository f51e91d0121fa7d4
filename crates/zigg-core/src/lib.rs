//! ZIGG Core Library
//!
//! This crate provides the domain models, error types, configuration and form
//! validation shared by every ZIGG admin console component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ConsoleConfig;
pub use error::{ConsoleError, ErrorMetadata, LogLevel};
