//! Join Resolver - builds the lineage table from a snapshot
//!
//! # Algorithm
//! 1. Index signups by session_key, rides by user_id, transactions and
//!    reviews by ride_id (O(N), input order kept per bucket)
//! 2. Walk downloads in input order and expand each one through the indexes
//! 3. Count references that never attach (orphans)
//!
//! Transactions and reviews of the same ride form a cross product, so a ride
//! with 2 transactions and 3 reviews yields 6 rows.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use funnel_storage::{EntitySnapshot, Review, RideRequest, Signup, Transaction};

use crate::features::lineage::domain::{JoinStats, LineageRow, LineageTable};

/// Left-join resolver over one snapshot
///
/// # Example
/// ```ignore
/// let lineage = JoinResolver::new(&snapshot).resolve();
/// assert!(lineage.len() >= snapshot.downloads.len());
/// ```
pub struct JoinResolver<'a> {
    snapshot: &'a EntitySnapshot,
    signups_by_session: FxHashMap<&'a str, Vec<&'a Signup>>,
    rides_by_user: FxHashMap<&'a str, Vec<&'a RideRequest>>,
    transactions_by_ride: FxHashMap<&'a str, Vec<&'a Transaction>>,
    reviews_by_ride: FxHashMap<&'a str, Vec<&'a Review>>,
}

impl<'a> JoinResolver<'a> {
    /// Build the hash indexes for `snapshot`
    pub fn new(snapshot: &'a EntitySnapshot) -> Self {
        let mut signups_by_session: FxHashMap<&str, Vec<&Signup>> = FxHashMap::default();
        for signup in &snapshot.signups {
            signups_by_session
                .entry(signup.session_key.as_str())
                .or_default()
                .push(signup);
        }

        let mut rides_by_user: FxHashMap<&str, Vec<&RideRequest>> = FxHashMap::default();
        for ride in &snapshot.ride_requests {
            rides_by_user
                .entry(ride.user_id.as_str())
                .or_default()
                .push(ride);
        }

        let mut transactions_by_ride: FxHashMap<&str, Vec<&Transaction>> = FxHashMap::default();
        for transaction in &snapshot.transactions {
            transactions_by_ride
                .entry(transaction.ride_id.as_str())
                .or_default()
                .push(transaction);
        }

        let mut reviews_by_ride: FxHashMap<&str, Vec<&Review>> = FxHashMap::default();
        for review in &snapshot.reviews {
            reviews_by_ride
                .entry(review.ride_id.as_str())
                .or_default()
                .push(review);
        }

        Self {
            snapshot,
            signups_by_session,
            rides_by_user,
            transactions_by_ride,
            reviews_by_ride,
        }
    }

    /// Produce the lineage table in download input order
    pub fn resolve(&self) -> LineageTable<'a> {
        let mut rows = Vec::with_capacity(self.snapshot.downloads.len());

        for download in &self.snapshot.downloads {
            let base = LineageRow::download_only(download);
            match self.signups_by_session.get(download.download_key.as_str()) {
                None => rows.push(base),
                Some(signups) => {
                    for signup in signups {
                        self.expand_signup(
                            LineageRow {
                                signup: Some(*signup),
                                ..base
                            },
                            &mut rows,
                        );
                    }
                }
            }
        }

        let stats = self.join_stats(rows.len());
        debug!(
            downloads = stats.downloads,
            lineage_rows = stats.lineage_rows,
            fan_out = stats.fan_out(),
            "lineage resolved"
        );
        if stats.orphans() > 0 {
            warn!(
                orphan_signups = stats.orphan_signups,
                orphan_transactions = stats.orphan_transactions,
                orphan_reviews = stats.orphan_reviews,
                "unmatched references dropped from lineage"
            );
        }

        LineageTable { rows, stats }
    }

    fn expand_signup(&self, row: LineageRow<'a>, out: &mut Vec<LineageRow<'a>>) {
        let rides = row
            .signup
            .and_then(|s| self.rides_by_user.get(s.user_id.as_str()));

        match rides {
            None => out.push(row),
            Some(rides) => {
                for ride in rides {
                    self.expand_ride(
                        LineageRow {
                            ride: Some(*ride),
                            ..row
                        },
                        out,
                    );
                }
            }
        }
    }

    fn expand_ride(&self, row: LineageRow<'a>, out: &mut Vec<LineageRow<'a>>) {
        let ride_id = match row.ride_id() {
            Some(id) => id,
            None => {
                out.push(row);
                return;
            }
        };

        let transactions = attachments(self.transactions_by_ride.get(ride_id));
        let reviews = attachments(self.reviews_by_ride.get(ride_id));

        for transaction in &transactions {
            for review in &reviews {
                out.push(LineageRow {
                    transaction: *transaction,
                    review: *review,
                    ..row
                });
            }
        }
    }

    fn join_stats(&self, lineage_rows: usize) -> JoinStats {
        let download_keys: FxHashSet<&str> = self
            .snapshot
            .downloads
            .iter()
            .map(|d| d.download_key.as_str())
            .collect();
        let ride_ids: FxHashSet<&str> = self
            .snapshot
            .ride_requests
            .iter()
            .map(|r| r.ride_id.as_str())
            .collect();

        JoinStats {
            downloads: self.snapshot.downloads.len(),
            lineage_rows,
            orphan_signups: self
                .snapshot
                .signups
                .iter()
                .filter(|s| !download_keys.contains(s.session_key.as_str()))
                .count(),
            orphan_transactions: self
                .snapshot
                .transactions
                .iter()
                .filter(|t| !ride_ids.contains(t.ride_id.as_str()))
                .count(),
            orphan_reviews: self
                .snapshot
                .reviews
                .iter()
                .filter(|r| !ride_ids.contains(r.ride_id.as_str()))
                .count(),
        }
    }
}

/// Left-join attachment list: the matches, or a single `None`
fn attachments<'a, T>(matches: Option<&Vec<&'a T>>) -> Vec<Option<&'a T>> {
    match matches {
        Some(items) if !items.is_empty() => items.iter().map(|item| Some(*item)).collect(),
        _ => vec![None],
    }
}
