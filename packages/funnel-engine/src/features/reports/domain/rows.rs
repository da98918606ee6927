//! Output rows; serde field names are the column names

use chrono::NaiveDate;
use serde::Serialize;

use funnel_storage::Platform;

/// `funnel_steps`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStepRow {
    pub funnel_step: usize,
    pub funnel_name: String,
    pub value: u64,
    /// `value / previous value` as a percent string; `None` on the first step
    /// or after a zero
    pub previous_value_percent_string: Option<String>,
}

/// `funnel_by_dimensions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelDimensionRow {
    pub funnel_step: usize,
    pub funnel_name: String,
    pub platform: Option<Platform>,
    pub age_range: Option<String>,
    pub download_date: Option<NaiveDate>,
    pub user_count: u64,
    pub unique_users: u64,
    pub ride_count: u64,
    pub fare: f64,
}

/// `funnel_by_age_range`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeRangeFunnelRow {
    pub funnel_step: usize,
    pub funnel_metric: String,
    pub age_range: Option<String>,
    pub value: u64,
    pub step_conversion: Option<f64>,
    pub overall_conversion: Option<f64>,
}

/// `general_funnel`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralFunnelRow {
    pub funnel_step: usize,
    pub funnel_metric: String,
    pub value: u64,
    pub step_conversion: Option<f64>,
    pub overall_conversion: Option<f64>,
}

/// `funnel_by_platform`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformFunnelRow {
    pub funnel_step: usize,
    pub funnel_metric: String,
    pub platform: Option<Platform>,
    pub value: u64,
    pub step_conversion: Option<f64>,
    pub overall_conversion: Option<f64>,
}

/// `platform_distribution`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformDistributionRow {
    pub platform: Option<Platform>,
    pub download_count: u64,
    pub total_downloads: u64,
    pub pct_of_downloads_string: String,
}

/// `approved_ride_averages`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovedRideAveragesRow {
    /// Minutes from pickup to dropoff
    pub avg_duration: Option<f64>,
    pub avg_cost: Option<f64>,
}

/// `cancel_wait_histogram`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelWaitRow {
    pub age_range: Option<String>,
    pub wait_duration_bucket: String,
    pub count: u64,
}
