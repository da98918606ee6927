//! Entity models for the five funnel collections
//!
//! All entities are immutable snapshots for the duration of a run. Keys are
//! kept as strings so integer and text keyed sources load the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

/// Download key (unique per download, doubles as the signup session key)
pub type DownloadKey = String;

/// User ID (unique per signed-up user)
pub type UserId = String;

/// Ride ID (unique per ride request)
pub type RideId = String;

/// Named input collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Download,
    Signup,
    RideRequest,
    Transaction,
    Review,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Download,
        Collection::Signup,
        Collection::RideRequest,
        Collection::Transaction,
        Collection::Review,
    ];

    /// Table / collection name in the external store
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Download => "download",
            Collection::Signup => "signup",
            Collection::RideRequest => "ride_request",
            Collection::Transaction => "transaction",
            Collection::Review => "review",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Download platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        }
    }
}

impl FromStr for Platform {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "web" => Ok(Platform::Web),
            other => Err(StorageError::serialization(format!(
                "Unknown platform '{}'. Valid platforms: ios, android, web",
                other
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment outcome of a transaction
///
/// Statuses other than Approved/Denied are kept verbatim so they stay in
/// their own group instead of merging into one of the known ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChargeStatus {
    Approved,
    Denied,
    Other(String),
}

impl ChargeStatus {
    /// Case-insensitive parse; never fails
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "approved" => ChargeStatus::Approved,
            "denied" => ChargeStatus::Denied,
            _ => ChargeStatus::Other(trimmed.to_string()),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ChargeStatus::Approved)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChargeStatus::Approved => "Approved",
            ChargeStatus::Denied => "Denied",
            ChargeStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// App download (funnel entry point)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    pub download_key: DownloadKey,
    pub platform: Option<Platform>,
    pub download_timestamp: DateTime<Utc>,
}

impl Download {
    pub fn new(
        download_key: impl Into<String>,
        platform: Option<Platform>,
        download_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            download_key: download_key.into(),
            platform,
            download_timestamp,
        }
    }
}

/// Account signup, linked to a download through its session key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signup {
    /// References `Download::download_key`
    pub session_key: DownloadKey,
    pub user_id: UserId,
    pub signup_timestamp: DateTime<Utc>,
    pub age_range: Option<String>,
}

impl Signup {
    pub fn new(
        session_key: impl Into<String>,
        user_id: impl Into<String>,
        signup_timestamp: DateTime<Utc>,
        age_range: Option<&str>,
    ) -> Self {
        Self {
            session_key: session_key.into(),
            user_id: user_id.into(),
            signup_timestamp,
            age_range: age_range.map(str::to_string),
        }
    }
}

/// Ride request with its lifecycle timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub ride_id: RideId,
    pub user_id: UserId,
    pub driver_id: Option<String>,
    pub request_timestamp: DateTime<Utc>,
    pub accept_timestamp: Option<DateTime<Utc>>,
    pub pickup_timestamp: Option<DateTime<Utc>>,
    pub dropoff_timestamp: Option<DateTime<Utc>>,
    pub cancel_timestamp: Option<DateTime<Utc>>,
}

impl RideRequest {
    /// A requested ride with no further lifecycle events yet
    pub fn requested(
        ride_id: impl Into<String>,
        user_id: impl Into<String>,
        request_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            ride_id: ride_id.into(),
            user_id: user_id.into(),
            driver_id: None,
            request_timestamp,
            accept_timestamp: None,
            pickup_timestamp: None,
            dropoff_timestamp: None,
            cancel_timestamp: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.dropoff_timestamp.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_timestamp.is_some()
    }
}

/// Payment attempt for a ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Load-order ordinal assigned by the source; identifies the transaction
    /// when the same ride has several payment attempts
    pub transaction_seq: u64,
    pub ride_id: RideId,
    pub charge_status: ChargeStatus,
    pub purchase_amount: f64,
}

impl Transaction {
    pub fn new(
        transaction_seq: u64,
        ride_id: impl Into<String>,
        charge_status: ChargeStatus,
        purchase_amount: f64,
    ) -> Self {
        Self {
            transaction_seq,
            ride_id: ride_id.into(),
            charge_status,
            purchase_amount,
        }
    }
}

/// Rider review of a ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub ride_id: RideId,
    pub user_id: UserId,
    pub rating: i64,
    pub review_text: Option<String>,
}

impl Review {
    pub fn new(
        review_id: impl Into<String>,
        ride_id: impl Into<String>,
        user_id: impl Into<String>,
        rating: i64,
    ) -> Self {
        Self {
            review_id: review_id.into(),
            ride_id: ride_id.into(),
            user_id: user_id.into(),
            rating,
            review_text: None,
        }
    }
}

/// The five collections loaded for one computation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub downloads: Vec<Download>,
    pub signups: Vec<Signup>,
    pub ride_requests: Vec<RideRequest>,
    pub transactions: Vec<Transaction>,
    pub reviews: Vec<Review>,
}

/// Record counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCounts {
    pub downloads: usize,
    pub signups: usize,
    pub ride_requests: usize,
    pub transactions: usize,
    pub reviews: usize,
}

impl EntitySnapshot {
    pub fn new(
        downloads: Vec<Download>,
        signups: Vec<Signup>,
        ride_requests: Vec<RideRequest>,
        transactions: Vec<Transaction>,
        reviews: Vec<Review>,
    ) -> Self {
        Self {
            downloads,
            signups,
            ride_requests,
            transactions,
            reviews,
        }
    }

    pub fn counts(&self) -> SnapshotCounts {
        SnapshotCounts {
            downloads: self.downloads.len(),
            signups: self.signups.len(),
            ride_requests: self.ride_requests.len(),
            transactions: self.transactions.len(),
            reviews: self.reviews.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }
}
