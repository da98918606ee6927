//! Lineage rows borrow from the loaded snapshot; they live for one run.

use funnel_storage::{Download, Review, RideRequest, Signup, Transaction};
use serde::Serialize;

/// One joined record tracing a user's path across entities
#[derive(Debug, Clone, Copy)]
pub struct LineageRow<'a> {
    pub download: &'a Download,
    pub signup: Option<&'a Signup>,
    pub ride: Option<&'a RideRequest>,
    pub transaction: Option<&'a Transaction>,
    pub review: Option<&'a Review>,
}

impl<'a> LineageRow<'a> {
    /// Row for a download with nothing attached downstream
    pub fn download_only(download: &'a Download) -> Self {
        Self {
            download,
            signup: None,
            ride: None,
            transaction: None,
            review: None,
        }
    }

    pub fn download_key(&self) -> &'a str {
        &self.download.download_key
    }

    pub fn user_id(&self) -> Option<&'a str> {
        self.signup.map(|s| s.user_id.as_str())
    }

    pub fn ride_id(&self) -> Option<&'a str> {
        self.ride.map(|r| r.ride_id.as_str())
    }

    pub fn age_range(&self) -> Option<&'a str> {
        self.signup.and_then(|s| s.age_range.as_deref())
    }
}

/// Counters reported by the join resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub downloads: usize,
    pub lineage_rows: usize,
    /// Signups whose session_key matches no download
    pub orphan_signups: usize,
    /// Transactions whose ride_id matches no ride request
    pub orphan_transactions: usize,
    /// Reviews whose ride_id matches no ride request
    pub orphan_reviews: usize,
}

impl JoinStats {
    pub fn orphans(&self) -> usize {
        self.orphan_signups + self.orphan_transactions + self.orphan_reviews
    }

    /// Lineage rows per download (1.0 means no fan-out)
    pub fn fan_out(&self) -> f64 {
        if self.downloads == 0 {
            return 0.0;
        }
        self.lineage_rows as f64 / self.downloads as f64
    }
}

/// Resolved lineage plus the stats gathered while building it
#[derive(Debug, Clone, Default)]
pub struct LineageTable<'a> {
    pub rows: Vec<LineageRow<'a>>,
    pub stats: JoinStats,
}

impl<'a> LineageTable<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineageRow<'a>> {
        self.rows.iter()
    }
}
