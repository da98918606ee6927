//! Report builders
//!
//! Each builder is a pure function of the [`ReportContext`]; `build_report`
//! dispatches on [`ReportKind`].

mod funnel_steps;
mod funnel_tables;
mod platform_distribution;
mod ride_metrics;

pub use funnel_steps::{funnel_steps, session_ride_status, SessionRideStatus};
pub use funnel_tables::{funnel_by_age_range, funnel_by_dimensions, funnel_by_platform, general_funnel};
pub use platform_distribution::platform_distribution;
pub use ride_metrics::{approved_ride_averages, cancel_wait_histogram, WaitBuckets};

use funnel_storage::EntitySnapshot;

use super::domain::ReportTable;
use crate::config::{ReportKind, ValidatedConfig};
use crate::features::lineage::LineageTable;
use crate::shared::models::{FunnelError, Result};

/// Inputs shared by every report of a run
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub snapshot: &'a EntitySnapshot,
    pub lineage: Option<&'a LineageTable<'a>>,
    pub config: &'a ValidatedConfig,
}

impl<'a> ReportContext<'a> {
    pub fn new(
        snapshot: &'a EntitySnapshot,
        lineage: Option<&'a LineageTable<'a>>,
        config: &'a ValidatedConfig,
    ) -> Self {
        Self {
            snapshot,
            lineage,
            config,
        }
    }

    /// Lineage table, required by funnel-style reports
    pub fn lineage(&self, kind: ReportKind) -> Result<&'a LineageTable<'a>> {
        self.lineage.ok_or_else(|| {
            FunnelError::internal("lineage table was not built for this run")
                .with_report(kind.as_str())
        })
    }
}

/// Build one result table
pub fn build_report(kind: ReportKind, ctx: &ReportContext<'_>) -> Result<ReportTable> {
    let parallel = ctx.config.parallel();

    let table = match kind {
        ReportKind::FunnelSteps => ReportTable::FunnelSteps(funnel_steps(ctx.snapshot)),
        ReportKind::PlatformDistribution => {
            ReportTable::PlatformDistribution(platform_distribution(&ctx.snapshot.downloads))
        }
        ReportKind::FunnelByDimensions => {
            ReportTable::FunnelByDimensions(funnel_by_dimensions(ctx.lineage(kind)?, parallel))
        }
        ReportKind::FunnelByAgeRange => {
            ReportTable::FunnelByAgeRange(funnel_by_age_range(ctx.lineage(kind)?, parallel))
        }
        ReportKind::GeneralFunnel => {
            ReportTable::GeneralFunnel(general_funnel(ctx.lineage(kind)?, parallel))
        }
        ReportKind::FunnelByPlatform => {
            ReportTable::FunnelByPlatform(funnel_by_platform(ctx.lineage(kind)?, parallel))
        }
        ReportKind::ApprovedRideAverages => ReportTable::ApprovedRideAverages(vec![
            approved_ride_averages(ctx.lineage(kind)?),
        ]),
        ReportKind::CancelWaitHistogram => {
            let buckets = WaitBuckets::new(&ctx.config.wait_buckets().bounds_minutes)
                .map_err(|e| e.with_report(kind.as_str()))?;
            ReportTable::CancelWaitHistogram(cancel_wait_histogram(ctx.lineage(kind)?, &buckets))
        }
    };

    Ok(table)
}
