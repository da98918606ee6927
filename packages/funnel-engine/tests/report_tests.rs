//! Report tables over the canonical dataset

mod common;

use common::*;
use funnel_engine::features::aggregation::PaymentBreakdown;
use funnel_engine::features::reports::application::{
    approved_ride_averages, cancel_wait_histogram, funnel_by_age_range, funnel_steps,
    general_funnel, platform_distribution, WaitBuckets,
};
use funnel_engine::config::ParallelConfig;
use funnel_engine::{
    Aggregator, ConversionCalculator, DimensionKey, DimensionSet, FunnelStage, JoinResolver,
};
use funnel_storage::{ChargeStatus, Platform};
use pretty_assertions::assert_eq;

#[test]
fn test_general_funnel_values_and_ratios() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let rows = general_funnel(&lineage, &ParallelConfig::default());

    let values: Vec<u64> = rows.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![5, 3, 2, 2, 1, 1, 1]);

    let metrics: Vec<&str> = rows.iter().map(|r| r.funnel_metric.as_str()).collect();
    assert_eq!(
        metrics,
        vec![
            "downloads",
            "signups",
            "ride_requesters",
            "accepted_riders",
            "completed_riders",
            "paying_riders",
            "reviewers"
        ]
    );

    assert_eq!(rows[0].step_conversion, None);
    assert_eq!(rows[0].overall_conversion, Some(1.0));
    assert_eq!(rows[1].step_conversion, Some(0.6));
    assert_eq!(rows[4].step_conversion, Some(0.5));
    assert_eq!(rows[6].overall_conversion, Some(0.2));
}

#[test]
fn test_event_counts_include_fan_out() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let rows = Aggregator::new(DimensionSet::None).aggregate(&lineage.rows);

    let events: Vec<u64> = rows.iter().map(|r| r.event_count).collect();
    assert_eq!(events, vec![9, 7, 6, 5, 4, 2, 4]);

    let rides: Vec<u64> = rows.iter().map(|r| r.secondary_count).collect();
    assert_eq!(rides, vec![0, 0, 3, 2, 1, 1, 1]);
}

#[test]
fn test_denied_transaction_contributes_nothing() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let aggregation = Aggregator::new(DimensionSet::None).run(&lineage.rows);

    let payment = &aggregation.stages[FunnelStage::Payment.index()];
    assert_eq!(payment.secondary_count, 1);
    assert_eq!(payment.sum_metric, 18.5);

    let denied: Vec<&PaymentBreakdown> = aggregation
        .payments
        .iter()
        .filter(|p| p.charge_status == ChargeStatus::Denied)
        .collect();
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].ride_count, 1);
    assert_eq!(denied[0].amount, 18.5);
}

#[test]
fn test_download_without_signup_only_counts_at_stage_zero() {
    let snapshot = SnapshotBuilder::new()
        .with_download("lonely", Some(Platform::Web))
        .build();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let rows = Aggregator::new(DimensionSet::Platform).aggregate(&lineage.rows);

    assert_eq!(rows.len(), FunnelStage::COUNT);
    assert_eq!(rows[0].unique_count, 1);
    assert!(rows[1..].iter().all(|r| r.unique_count == 0 && r.event_count == 0));
}

#[test]
fn test_funnel_steps_agree_with_lineage_funnel() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();

    let rollup: Vec<u64> = funnel_steps(&snapshot).iter().map(|r| r.value).collect();
    let aggregated: Vec<u64> = general_funnel(&lineage, &ParallelConfig::default())
        .iter()
        .map(|r| r.value)
        .collect();
    assert_eq!(rollup, aggregated);
}

#[test]
fn test_shared_download_never_outgrows_stage_zero() {
    let snapshot = SnapshotBuilder::new()
        .with_download("d1", Some(Platform::Ios))
        .with_signup("d1", "u1", Some("18-24"))
        .with_signup("d1", "u2", Some("18-24"))
        .with_ride(RideBuilder::new("r1", "u1").accepted(2).build())
        .with_ride(RideBuilder::new("r2", "u2").build())
        .build();
    let lineage = JoinResolver::new(&snapshot).resolve();

    let rollup: Vec<u64> = funnel_steps(&snapshot).iter().map(|r| r.value).collect();
    assert_eq!(rollup, vec![1, 1, 1, 1, 0, 0, 0]);

    let aggregated: Vec<u64> = general_funnel(&lineage, &ParallelConfig::default())
        .iter()
        .map(|r| r.value)
        .collect();
    assert_eq!(aggregated, rollup);

    let by_age = funnel_by_age_range(&lineage, &ParallelConfig::default());
    assert!(by_age.iter().all(|r| r.value <= 1));
}

#[test]
fn test_funnel_steps_percent_strings() {
    let snapshot = canonical_snapshot();
    let rows = funnel_steps(&snapshot);

    let percents: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.previous_value_percent_string.as_deref())
        .collect();
    assert_eq!(
        percents,
        vec![
            None,
            Some("60.00%"),
            Some("66.67%"),
            Some("100.00%"),
            Some("50.00%"),
            Some("100.00%"),
            Some("100.00%"),
        ]
    );
}

#[test]
fn test_funnel_by_age_range_partitions() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let rows = funnel_by_age_range(&lineage, &ParallelConfig::default());

    assert_eq!(rows.len(), 3 * FunnelStage::COUNT);

    let values_for = |age: Option<&str>| -> Vec<u64> {
        rows.iter()
            .filter(|r| r.age_range.as_deref() == age)
            .map(|r| r.value)
            .collect()
    };
    assert_eq!(values_for(None), vec![3, 1, 0, 0, 0, 0, 0]);
    assert_eq!(values_for(Some("18-24")), vec![1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(values_for(Some("25-34")), vec![1, 1, 1, 1, 0, 0, 0]);

    // Null age range sorts first
    assert_eq!(rows[0].age_range, None);
    // value[2] = 0 in the null group
    assert_eq!(rows[3].step_conversion, None);
}

#[test]
fn test_platform_distribution_canonical() {
    let snapshot = canonical_snapshot();
    let rows = platform_distribution(&snapshot.downloads);

    let flat: Vec<_> = rows
        .iter()
        .map(|r| (r.platform, r.download_count, r.pct_of_downloads_string.as_str()))
        .collect();
    assert_eq!(
        flat,
        vec![
            (Some(Platform::Ios), 2, "40.00%"),
            (None, 1, "20.00%"),
            (Some(Platform::Android), 1, "20.00%"),
            (Some(Platform::Web), 1, "20.00%"),
        ]
    );
    assert!(rows.iter().all(|r| r.total_downloads == 5));
}

#[test]
fn test_approved_ride_averages_canonical() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let row = approved_ride_averages(&lineage);

    assert_eq!(row.avg_duration, Some(20.0));
    assert_eq!(row.avg_cost, Some(18.5));
}

#[test]
fn test_cancel_wait_histogram_canonical() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let buckets = WaitBuckets::new(&[2, 5, 10, 15, 20]).unwrap();
    let rows = cancel_wait_histogram(&lineage, &buckets);

    let flat: Vec<_> = rows
        .iter()
        .map(|r| (r.age_range.as_deref(), r.wait_duration_bucket.as_str(), r.count))
        .collect();
    assert_eq!(
        flat,
        vec![(Some("18-24"), "2-5 min", 1), (Some("25-34"), "10-15 min", 1)]
    );
}

#[test]
fn test_conversion_laws_hold_on_every_dimension_set() {
    let snapshot = generated_snapshot(200, 3);
    let lineage = JoinResolver::new(&snapshot).resolve();

    for dimensions in [
        DimensionSet::None,
        DimensionSet::AgeRange,
        DimensionSet::Platform,
        DimensionSet::PlatformAgeDate,
    ] {
        let aggregates = Aggregator::new(dimensions).aggregate(&lineage.rows);
        let conversions = ConversionCalculator::new().from_aggregates(&aggregates, |r| r.unique_count);
        assert_conversion_laws(&conversions);
    }
}

#[test]
fn test_single_partition_key_is_empty() {
    let snapshot = canonical_snapshot();
    let lineage = JoinResolver::new(&snapshot).resolve();
    let rows = Aggregator::new(DimensionSet::None).aggregate(&lineage.rows);
    assert!(rows.iter().all(|r| r.key == DimensionKey::default()));
}
