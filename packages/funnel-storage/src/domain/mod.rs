//! Domain layer for the funnel entity loader
//!
//! # Domain Models
//!
//! - `Download`, `Signup`, `RideRequest`, `Transaction`, `Review`
//! - `EntitySnapshot`: the five collections loaded for one run
//!
//! # Port Trait
//!
//! - `EntitySource`: read-only access to the external tabular store
//!
//! # Examples
//!
//! ```rust,ignore
//! use funnel_storage::{EntitySource, SqliteEntitySource};
//!
//! async fn example() -> funnel_storage::Result<()> {
//!     let source = SqliteEntitySource::open("metrocar.db")?;
//!     let snapshot = source.snapshot().await?;
//!     println!("{} downloads", snapshot.downloads.len());
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod ports;

pub use models::{
    ChargeStatus, Collection, Download, DownloadKey, EntitySnapshot, Platform, Review, RideId,
    RideRequest, Signup, SnapshotCounts, Transaction, UserId,
};
pub use ports::EntitySource;
