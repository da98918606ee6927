//! Ride-level metrics: approved ride averages and wait-before-cancel buckets

use chrono::{DateTime, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use crate::features::lineage::LineageTable;
use crate::features::reports::domain::{ApprovedRideAveragesRow, CancelWaitRow};
use crate::shared::models::{FunnelError, Result};

/// `approved_ride_averages`
///
/// Duration averages over DISTINCT rides with an Approved transaction and
/// both pickup and dropoff; cost averages over DISTINCT Approved
/// transactions. Empty inputs give `None`.
pub fn approved_ride_averages(lineage: &LineageTable<'_>) -> ApprovedRideAveragesRow {
    let mut durations: FxHashMap<&str, f64> = FxHashMap::default();
    let mut costs: FxHashMap<u64, f64> = FxHashMap::default();

    for row in lineage.iter() {
        let (ride, transaction) = match (row.ride, row.transaction) {
            (Some(ride), Some(t)) if t.charge_status.is_approved() => (ride, t),
            _ => continue,
        };

        costs.insert(transaction.transaction_seq, transaction.purchase_amount);

        if let (Some(pickup), Some(dropoff)) = (ride.pickup_timestamp, ride.dropoff_timestamp) {
            durations.insert(ride.ride_id.as_str(), minutes_between(pickup, dropoff));
        }
    }

    ApprovedRideAveragesRow {
        avg_duration: ordered_mean(durations.into_iter()),
        avg_cost: ordered_mean(costs.into_iter()),
    }
}

/// Mean over values ordered by key so the float sum is reproducible
fn ordered_mean<K: Ord>(values: impl Iterator<Item = (K, f64)>) -> Option<f64> {
    let mut values: Vec<(K, f64)> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.0.cmp(&b.0));
    let sum: f64 = values.iter().map(|(_, v)| v).sum();
    Some(sum / values.len() as f64)
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}

/// Minute buckets for the cancel histogram
///
/// Bounds `[2, 5]` give `0-2 min` (< 2), `2-5 min` (2 up to 5), `5+ min`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitBuckets {
    bounds: Vec<u32>,
    labels: Vec<String>,
}

impl WaitBuckets {
    pub fn new(bounds: &[u32]) -> Result<Self> {
        if bounds.is_empty() {
            return Err(FunnelError::report("wait buckets need at least one bound"));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FunnelError::report(format!(
                "wait bucket bounds must be strictly increasing: {:?}",
                bounds
            )));
        }

        let mut labels = Vec::with_capacity(bounds.len() + 1);
        let mut lower = 0;
        for bound in bounds {
            labels.push(format!("{}-{} min", lower, bound));
            lower = *bound;
        }
        labels.push(format!("{}+ min", lower));

        Ok(Self {
            bounds: bounds.to_vec(),
            labels,
        })
    }

    /// Bucket index for a non-negative wait
    pub fn index_of(&self, minutes: f64) -> usize {
        self.bounds
            .iter()
            .position(|bound| minutes < *bound as f64)
            .unwrap_or(self.bounds.len())
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// `cancel_wait_histogram`: cancelled rides per (age range, wait bucket)
///
/// Counts DISTINCT rides; waits are `cancel - request` in minutes. Negative
/// waits are skipped. Only non-empty buckets are emitted, sorted by age range
/// (null first) then bucket order.
pub fn cancel_wait_histogram(lineage: &LineageTable<'_>, buckets: &WaitBuckets) -> Vec<CancelWaitRow> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut counts: FxHashMap<(Option<&str>, usize), u64> = FxHashMap::default();
    let mut negative = 0usize;

    for row in lineage.iter() {
        let ride = match row.ride {
            Some(ride) => ride,
            None => continue,
        };
        let cancelled = match ride.cancel_timestamp {
            Some(ts) => ts,
            None => continue,
        };
        if !seen.insert(ride.ride_id.as_str()) {
            continue;
        }

        let wait = minutes_between(ride.request_timestamp, cancelled);
        if wait < 0.0 {
            negative += 1;
            continue;
        }

        *counts
            .entry((row.age_range(), buckets.index_of(wait)))
            .or_default() += 1;
    }

    if negative > 0 {
        warn!(
            rides = negative,
            "skipped cancelled rides with cancel before request"
        );
    }

    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    entries
        .into_iter()
        .filter_map(|((age_range, index), count)| {
            buckets.label(index).map(|label| CancelWaitRow {
                age_range: age_range.map(str::to_string),
                wait_duration_bucket: label.to_string(),
                count,
            })
        })
        .collect()
}
