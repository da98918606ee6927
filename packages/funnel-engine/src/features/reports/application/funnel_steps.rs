//! Funnel steps from the per-session ride-status rollup
//!
//! Each download (session) gets one status record folding every ride of every
//! user who signed up through it, so counts are per session regardless of how
//! many signups, rides, transactions or reviews hang off it.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use funnel_storage::EntitySnapshot;

use crate::features::reports::domain::FunnelStepRow;
use crate::features::stage_classifier::FunnelStage;
use crate::shared::utils::{percent_of, percent_string};

/// Furthest milestones reached through one download session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionRideStatus {
    pub signed_up: bool,
    pub requested: bool,
    pub accepted: bool,
    pub completed: bool,
    pub paid: bool,
    pub reviewed: bool,
}

impl SessionRideStatus {
    fn reached(&self, stage: FunnelStage) -> bool {
        match stage {
            FunnelStage::Download => true,
            FunnelStage::Signup => self.signed_up,
            FunnelStage::RideRequested => self.requested,
            FunnelStage::RideAccepted => self.accepted,
            FunnelStage::RideCompleted => self.completed,
            FunnelStage::Payment => self.paid,
            FunnelStage::Review => self.reviewed,
        }
    }
}

/// Status per download_key; signups with an unknown session_key are ignored
pub fn session_ride_status(snapshot: &EntitySnapshot) -> FxHashMap<&str, SessionRideStatus> {
    let mut statuses: FxHashMap<&str, SessionRideStatus> = snapshot
        .downloads
        .iter()
        .map(|d| (d.download_key.as_str(), SessionRideStatus::default()))
        .collect();

    let mut sessions_by_user: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for signup in &snapshot.signups {
        if let Some(status) = statuses.get_mut(signup.session_key.as_str()) {
            status.signed_up = true;
            sessions_by_user
                .entry(signup.user_id.as_str())
                .or_default()
                .push(signup.session_key.as_str());
        }
    }

    let approved_rides: FxHashSet<&str> = snapshot
        .transactions
        .iter()
        .filter(|t| t.charge_status.is_approved())
        .map(|t| t.ride_id.as_str())
        .collect();
    let reviewed_rides: FxHashSet<&str> = snapshot
        .reviews
        .iter()
        .map(|r| r.ride_id.as_str())
        .collect();

    for ride in &snapshot.ride_requests {
        let sessions = match sessions_by_user.get(ride.user_id.as_str()) {
            Some(sessions) => sessions,
            None => continue,
        };
        for session in sessions {
            if let Some(status) = statuses.get_mut(session) {
                status.requested = true;
                status.accepted |= ride.accept_timestamp.is_some();
                status.completed |= ride.dropoff_timestamp.is_some();
                status.paid |= approved_rides.contains(ride.ride_id.as_str());
                status.reviewed |= reviewed_rides.contains(ride.ride_id.as_str());
            }
        }
    }

    statuses
}

/// `funnel_steps` table: one row per stage with percent of the previous step
pub fn funnel_steps(snapshot: &EntitySnapshot) -> Vec<FunnelStepRow> {
    let statuses = session_ride_status(snapshot);

    let mut rows = Vec::with_capacity(FunnelStage::COUNT);
    let mut previous: Option<u64> = None;

    for stage in FunnelStage::ALL {
        let value = statuses.values().filter(|s| s.reached(stage)).count() as u64;

        let previous_value_percent_string = previous
            .and_then(|prev| percent_of(value as f64, prev as f64))
            .map(percent_string);

        rows.push(FunnelStepRow {
            funnel_step: stage.index(),
            funnel_name: stage.name().to_string(),
            value,
            previous_value_percent_string,
        });
        previous = Some(value);
    }

    debug!(sessions = statuses.len(), "funnel steps rolled up");
    rows
}
