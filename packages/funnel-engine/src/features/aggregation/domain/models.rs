//! Aggregated metric rows

use serde::Serialize;

use funnel_storage::ChargeStatus;

use super::dimension::DimensionKey;
use crate::features::stage_classifier::FunnelStage;

/// One (dimension tuple, stage) row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAggregate {
    pub key: DimensionKey,
    pub stage: FunnelStage,
    /// Rows satisfying the stage, fan-out included
    pub event_count: u64,
    /// DISTINCT download_key (stage 0) or user_id (stages 1..=6)
    pub unique_count: u64,
    /// DISTINCT ride_id at stages 2..=6, else 0
    pub secondary_count: u64,
    /// Approved purchase amount at stage 5, else 0
    pub sum_metric: f64,
}

impl StageAggregate {
    pub fn empty(key: DimensionKey, stage: FunnelStage) -> Self {
        Self {
            key,
            stage,
            event_count: 0,
            unique_count: 0,
            secondary_count: 0,
            sum_metric: 0.0,
        }
    }
}

/// Payment sub-group for one charge status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentBreakdown {
    pub key: DimensionKey,
    pub charge_status: ChargeStatus,
    pub event_count: u64,
    pub unique_users: u64,
    pub ride_count: u64,
    /// DISTINCT transaction amounts for this status
    pub amount: f64,
}
