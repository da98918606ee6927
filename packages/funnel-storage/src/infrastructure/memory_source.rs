//! In-Memory Entity Source
//!
//! Serves a pre-built snapshot. Collections can be marked unavailable to
//! exercise the all-or-nothing load contract.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::models::{
    Collection, Download, EntitySnapshot, Review, RideRequest, Signup, Transaction,
};
use crate::domain::ports::EntitySource;
use crate::error::{Result, StorageError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitySource {
    snapshot: Arc<EntitySnapshot>,
    unavailable: HashSet<Collection>,
}

impl InMemoryEntitySource {
    /// Wrap a snapshot; transaction ordinals are reassigned in load order
    pub fn new(mut snapshot: EntitySnapshot) -> Self {
        for (seq, tx) in snapshot.transactions.iter_mut().enumerate() {
            tx.transaction_seq = seq as u64;
        }
        Self {
            snapshot: Arc::new(snapshot),
            unavailable: HashSet::new(),
        }
    }

    /// Make reads of `collection` fail with `SourceUnavailable`
    pub fn with_unavailable(mut self, collection: Collection) -> Self {
        self.unavailable.insert(collection);
        self
    }

    fn check(&self, collection: Collection) -> Result<()> {
        if self.unavailable.contains(&collection) {
            return Err(StorageError::source_unavailable(
                collection.table_name(),
                "collection marked unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl EntitySource for InMemoryEntitySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn downloads(&self) -> Result<Vec<Download>> {
        self.check(Collection::Download)?;
        Ok(self.snapshot.downloads.clone())
    }

    async fn signups(&self) -> Result<Vec<Signup>> {
        self.check(Collection::Signup)?;
        Ok(self.snapshot.signups.clone())
    }

    async fn ride_requests(&self) -> Result<Vec<RideRequest>> {
        self.check(Collection::RideRequest)?;
        Ok(self.snapshot.ride_requests.clone())
    }

    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.check(Collection::Transaction)?;
        Ok(self.snapshot.transactions.clone())
    }

    async fn reviews(&self) -> Result<Vec<Review>> {
        self.check(Collection::Review)?;
        Ok(self.snapshot.reviews.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ChargeStatus, Platform};
    use crate::error::ErrorKind;
    use chrono::{TimeZone, Utc};

    fn sample() -> EntitySnapshot {
        let ts = Utc.with_ymd_and_hms(2021, 3, 4, 10, 0, 0).unwrap();
        EntitySnapshot::new(
            vec![Download::new("d1", Some(Platform::Web), ts)],
            vec![Signup::new("d1", "u1", ts, None)],
            vec![RideRequest::requested("r1", "u1", ts)],
            vec![
                Transaction::new(99, "r1", ChargeStatus::Denied, 10.0),
                Transaction::new(99, "r1", ChargeStatus::Approved, 10.0),
            ],
            vec![Review::new("v1", "r1", "u1", 5)],
        )
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let source = InMemoryEntitySource::new(sample());
        let loaded = source.snapshot().await.unwrap();

        assert_eq!(loaded.downloads.len(), 1);
        assert_eq!(loaded.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_transaction_seq_reassigned() {
        let source = InMemoryEntitySource::new(sample());
        let txs = source.transactions().await.unwrap();

        let seqs: Vec<u64> = txs.iter().map(|t| t.transaction_seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_unavailable_collection_fails_snapshot() {
        let source = InMemoryEntitySource::new(sample()).with_unavailable(Collection::Review);

        assert!(source.downloads().await.is_ok());
        let err = source.snapshot().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SourceUnavailable);
        assert!(err.message.contains("review"));
    }
}
