//! Data models for the admin console
//!
//! Wire shapes of the admin REST API, organized by screen. JSON field names
//! are camelCase to match the backend.

mod audition;
mod auth;
mod board;
mod media;
mod notice;

pub use audition::*;
pub use auth::*;
pub use board::*;
pub use media::*;
pub use notice::*;
