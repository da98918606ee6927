//! Funnel entity loader
//!
//! Typed access to the five collections the funnel engine reads:
//! `download`, `signup`, `ride_request`, `transaction`, `review`.
//!
//! ## Principles
//!
//! 1. **Read-only**: the loader never mutates the external store during a run
//! 2. **Snapshot**: a run sees one immutable `EntitySnapshot`
//! 3. **All-or-nothing**: any unreadable collection fails the load with
//!    `ErrorKind::SourceUnavailable`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_storage::{EntitySource, InMemoryEntitySource};
//!
//! let source = InMemoryEntitySource::new(snapshot);
//! let loaded = source.snapshot().await?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    ChargeStatus, Collection, Download, DownloadKey, EntitySnapshot, EntitySource, Platform,
    Review, RideId, RideRequest, Signup, SnapshotCounts, Transaction, UserId,
};

pub use infrastructure::InMemoryEntitySource;

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteEntitySource;
