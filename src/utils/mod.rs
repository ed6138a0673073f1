//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the application.

pub mod cancel;
pub mod version;

pub use cancel::Cancellation;
pub use version::{VERSION, get_version};
