//! Shared utilities

pub mod format;

pub use format::{percent_of, percent_string, safe_ratio};
