//! Test data builders

use chrono::{DateTime, Duration, Utc};
use funnel_storage::{
    ChargeStatus, Download, EntitySnapshot, Platform, Review, RideRequest, Signup, Transaction,
};

use super::fixtures::base_time;

/// Builder for EntitySnapshot
///
/// Transactions get `transaction_seq` in insertion order.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    downloads: Vec<Download>,
    signups: Vec<Signup>,
    rides: Vec<RideRequest>,
    transactions: Vec<Transaction>,
    reviews: Vec<Review>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a download at the base time
    pub fn with_download(mut self, key: &str, platform: Option<Platform>) -> Self {
        self.downloads.push(Download::new(key, platform, base_time()));
        self
    }

    /// Add a download on a specific day offset from the base time
    pub fn with_download_on_day(mut self, key: &str, platform: Option<Platform>, day: i64) -> Self {
        self.downloads
            .push(Download::new(key, platform, base_time() + Duration::days(day)));
        self
    }

    pub fn with_signup(mut self, download_key: &str, user_id: &str, age_range: Option<&str>) -> Self {
        self.signups
            .push(Signup::new(download_key, user_id, base_time(), age_range));
        self
    }

    pub fn with_ride(mut self, ride: RideRequest) -> Self {
        self.rides.push(ride);
        self
    }

    pub fn with_transaction(mut self, ride_id: &str, status: ChargeStatus, amount: f64) -> Self {
        let seq = self.transactions.len() as u64;
        self.transactions
            .push(Transaction::new(seq, ride_id, status, amount));
        self
    }

    pub fn with_review(mut self, ride_id: &str, user_id: &str, rating: i64) -> Self {
        let id = format!("review-{}", self.reviews.len());
        self.reviews.push(Review::new(id, ride_id, user_id, rating));
        self
    }

    pub fn build(self) -> EntitySnapshot {
        EntitySnapshot::new(
            self.downloads,
            self.signups,
            self.rides,
            self.transactions,
            self.reviews,
        )
    }
}

/// Builder for RideRequest with minute offsets from the request time
#[derive(Debug)]
pub struct RideBuilder {
    ride: RideRequest,
}

impl RideBuilder {
    pub fn new(ride_id: &str, user_id: &str) -> Self {
        Self {
            ride: RideRequest::requested(ride_id, user_id, base_time() + Duration::hours(1)),
        }
    }

    fn at(&self, minutes: i64) -> DateTime<Utc> {
        self.ride.request_timestamp + Duration::minutes(minutes)
    }

    pub fn with_driver(mut self, driver_id: &str) -> Self {
        self.ride.driver_id = Some(driver_id.to_string());
        self
    }

    pub fn accepted(mut self, minutes: i64) -> Self {
        self.ride.accept_timestamp = Some(self.at(minutes));
        self
    }

    pub fn picked_up(mut self, minutes: i64) -> Self {
        self.ride.pickup_timestamp = Some(self.at(minutes));
        self
    }

    pub fn dropped_off(mut self, minutes: i64) -> Self {
        self.ride.dropoff_timestamp = Some(self.at(minutes));
        self
    }

    pub fn cancelled(mut self, minutes: i64) -> Self {
        self.ride.cancel_timestamp = Some(self.at(minutes));
        self
    }

    /// Accepted at +1, picked up at +5, dropped off after `trip` minutes
    pub fn completed(self, trip: i64) -> Self {
        self.accepted(1).picked_up(5).dropped_off(5 + trip)
    }

    pub fn build(self) -> RideRequest {
        self.ride
    }
}
