//! Funnel tables computed from the lineage aggregator

use tracing::debug;

use crate::config::ParallelConfig;
use crate::features::aggregation::{Aggregator, DimensionSet, StageAggregate};
use crate::features::conversion::{ConversionCalculator, ConversionRow};
use crate::features::lineage::LineageTable;
use crate::features::reports::domain::{
    AgeRangeFunnelRow, FunnelDimensionRow, GeneralFunnelRow, PlatformFunnelRow,
};

fn aggregate(
    lineage: &LineageTable<'_>,
    dimensions: DimensionSet,
    parallel: &ParallelConfig,
) -> Vec<StageAggregate> {
    let rows = Aggregator::new(dimensions)
        .with_parallel(parallel.clone())
        .aggregate(&lineage.rows);
    debug!(
        dimensions = dimensions.as_str(),
        rows = rows.len(),
        "funnel aggregated"
    );
    rows
}

/// Unique-count conversions for one dimension set
fn conversions(
    lineage: &LineageTable<'_>,
    dimensions: DimensionSet,
    parallel: &ParallelConfig,
) -> Vec<ConversionRow> {
    let rows = aggregate(lineage, dimensions, parallel);
    ConversionCalculator::new().from_aggregates(&rows, |r| r.unique_count)
}

/// `funnel_by_dimensions`: platform × age range × download date
pub fn funnel_by_dimensions(
    lineage: &LineageTable<'_>,
    parallel: &ParallelConfig,
) -> Vec<FunnelDimensionRow> {
    aggregate(lineage, DimensionSet::PlatformAgeDate, parallel)
        .into_iter()
        .map(|row| FunnelDimensionRow {
            funnel_step: row.stage.index(),
            funnel_name: row.stage.name().to_string(),
            platform: row.key.platform,
            age_range: row.key.age_range,
            download_date: row.key.download_date,
            user_count: row.event_count,
            unique_users: row.unique_count,
            ride_count: row.secondary_count,
            fare: row.sum_metric,
        })
        .collect()
}

/// `funnel_by_age_range`
pub fn funnel_by_age_range(
    lineage: &LineageTable<'_>,
    parallel: &ParallelConfig,
) -> Vec<AgeRangeFunnelRow> {
    conversions(lineage, DimensionSet::AgeRange, parallel)
        .into_iter()
        .map(|row| AgeRangeFunnelRow {
            funnel_step: row.stage.index(),
            funnel_metric: row.stage.metric_label().to_string(),
            age_range: row.key.age_range,
            value: row.value,
            step_conversion: row.step_conversion,
            overall_conversion: row.overall_conversion,
        })
        .collect()
}

/// `general_funnel`: single partition
pub fn general_funnel(lineage: &LineageTable<'_>, parallel: &ParallelConfig) -> Vec<GeneralFunnelRow> {
    conversions(lineage, DimensionSet::None, parallel)
        .into_iter()
        .map(|row| GeneralFunnelRow {
            funnel_step: row.stage.index(),
            funnel_metric: row.stage.metric_label().to_string(),
            value: row.value,
            step_conversion: row.step_conversion,
            overall_conversion: row.overall_conversion,
        })
        .collect()
}

/// `funnel_by_platform`
pub fn funnel_by_platform(
    lineage: &LineageTable<'_>,
    parallel: &ParallelConfig,
) -> Vec<PlatformFunnelRow> {
    conversions(lineage, DimensionSet::Platform, parallel)
        .into_iter()
        .map(|row| PlatformFunnelRow {
            funnel_step: row.stage.index(),
            funnel_metric: row.stage.metric_label().to_string(),
            platform: row.key.platform,
            value: row.value,
            step_conversion: row.step_conversion,
            overall_conversion: row.overall_conversion,
        })
        .collect()
}
