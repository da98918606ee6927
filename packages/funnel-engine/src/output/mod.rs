//! Result table export

mod json;

pub use json::JsonReporter;
