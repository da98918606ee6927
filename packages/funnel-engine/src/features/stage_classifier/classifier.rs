//! Stage predicates over lineage rows

use crate::features::lineage::LineageRow;

use super::stage::{FunnelStage, StageSet};

/// Whether `row` satisfies `stage`, tested independently of every other stage
pub fn satisfies(row: &LineageRow<'_>, stage: FunnelStage) -> bool {
    match stage {
        FunnelStage::Download => true,
        FunnelStage::Signup => row.signup.is_some(),
        FunnelStage::RideRequested => row.ride.is_some(),
        FunnelStage::RideAccepted => row.ride.is_some_and(|r| r.accept_timestamp.is_some()),
        FunnelStage::RideCompleted => row.ride.is_some_and(|r| r.dropoff_timestamp.is_some()),
        FunnelStage::Payment => row
            .transaction
            .is_some_and(|t| t.charge_status.is_approved()),
        FunnelStage::Review => row.review.is_some(),
    }
}

/// All stages `row` satisfies
pub fn classify(row: &LineageRow<'_>) -> StageSet {
    FunnelStage::ALL
        .into_iter()
        .filter(|stage| satisfies(row, *stage))
        .collect()
}

/// Highest satisfied stage; informational only, aggregation uses `classify`
pub fn furthest_stage(row: &LineageRow<'_>) -> FunnelStage {
    classify(row).max().unwrap_or(FunnelStage::Download)
}
