//! Entity Source Port (Trait Interface)
//!
//! Port/Adapter pattern for the external data collaborator:
//! - SQLite: file-backed tables (default feature)
//! - InMemory: fixtures and unit tests

use async_trait::async_trait;
use tracing::debug;

use super::models::{Download, EntitySnapshot, Review, RideRequest, Signup, Transaction};
use crate::Result;

/// Read-only access to the five funnel collections
///
/// Every method either delivers the whole collection or fails with
/// `ErrorKind::SourceUnavailable`; a run never continues on partial input.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Human-readable source name (for logs)
    fn name(&self) -> &str;

    async fn downloads(&self) -> Result<Vec<Download>>;

    async fn signups(&self) -> Result<Vec<Signup>>;

    async fn ride_requests(&self) -> Result<Vec<RideRequest>>;

    /// Transactions with `transaction_seq` assigned in load order
    async fn transactions(&self) -> Result<Vec<Transaction>>;

    async fn reviews(&self) -> Result<Vec<Review>>;

    /// Load all five collections concurrently
    ///
    /// The first failing collection aborts the load.
    async fn snapshot(&self) -> Result<EntitySnapshot> {
        let (downloads, signups, ride_requests, transactions, reviews) = tokio::try_join!(
            self.downloads(),
            self.signups(),
            self.ride_requests(),
            self.transactions(),
            self.reviews(),
        )?;

        let snapshot =
            EntitySnapshot::new(downloads, signups, ride_requests, transactions, reviews);
        debug!(source = self.name(), counts = ?snapshot.counts(), "snapshot loaded");
        Ok(snapshot)
    }
}
