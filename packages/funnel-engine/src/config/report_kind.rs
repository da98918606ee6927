//! Report identifiers
//!
//! Each report is one output table with a stable column schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Result table produced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// (funnel_step, funnel_name, value, previous_value_percent_string)
    FunnelSteps,
    /// Platform × age range × download date funnel
    FunnelByDimensions,
    /// Funnel partitioned by age range, with conversions
    FunnelByAgeRange,
    /// Single-partition funnel with conversions
    GeneralFunnel,
    /// Download share per platform
    PlatformDistribution,
    /// Average duration and cost of approved rides
    ApprovedRideAverages,
    /// Wait time before cancellation, bucketed per age range
    CancelWaitHistogram,
    /// Funnel partitioned by platform, with conversions
    FunnelByPlatform,
}

impl ReportKind {
    pub const ALL: [ReportKind; 8] = [
        ReportKind::FunnelSteps,
        ReportKind::FunnelByDimensions,
        ReportKind::FunnelByAgeRange,
        ReportKind::GeneralFunnel,
        ReportKind::PlatformDistribution,
        ReportKind::ApprovedRideAverages,
        ReportKind::CancelWaitHistogram,
        ReportKind::FunnelByPlatform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunnelSteps => "funnel_steps",
            Self::FunnelByDimensions => "funnel_by_dimensions",
            Self::FunnelByAgeRange => "funnel_by_age_range",
            Self::GeneralFunnel => "general_funnel",
            Self::PlatformDistribution => "platform_distribution",
            Self::ApprovedRideAverages => "approved_ride_averages",
            Self::CancelWaitHistogram => "cancel_wait_histogram",
            Self::FunnelByPlatform => "funnel_by_platform",
        }
    }

    /// True for reports computed from the shared lineage table
    pub fn uses_lineage(&self) -> bool {
        !matches!(self, Self::FunnelSteps | Self::PlatformDistribution)
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}

impl FromStr for ReportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ConfigError::unknown_report_with_suggestion(s, Self::valid_names()))
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
