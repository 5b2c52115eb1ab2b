//! Shared utilities.
//!
//! - [`app_data`] - Configuration and catalog locations (XDG-compliant)
//! - [`progress`] - Progress spinner that compiles away without the `progress` feature

pub mod app_data;
pub mod progress;

pub use app_data::*;
