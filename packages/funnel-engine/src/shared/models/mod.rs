//! Shared models

mod error;

pub use error::{ErrorKind, FunnelError, Result};
