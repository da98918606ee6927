//! Property-based tests for the funnel engine
//!
//! Invariants that hold for ALL snapshots:
//! - Download is the universal entry point: unique_count(k) <= unique_count(0)
//! - overall_conversion[0] == 1, ratios never NaN/Infinity
//! - step == overall[i] / overall[i-1] when defined
//! - Parallel aggregation == sequential aggregation
//! - Per-session rollup agrees with the lineage funnel

mod common;

use common::*;
use funnel_engine::config::ParallelConfig;
use funnel_engine::features::reports::application::{funnel_steps, general_funnel};
use funnel_engine::{
    Aggregator, ConversionCalculator, DimensionSet, FunnelStage, JoinResolver,
};
use funnel_storage::{ChargeStatus, EntitySnapshot, Platform};
use proptest::prelude::*;

const DIMENSION_SETS: [DimensionSet; 4] = [
    DimensionSet::None,
    DimensionSet::PlatformAgeDate,
    DimensionSet::AgeRange,
    DimensionSet::Platform,
];

#[derive(Debug, Clone)]
struct RideShape {
    user: usize,
    accepted: bool,
    completed: bool,
    cancel_after: Option<i64>,
}

#[derive(Debug, Clone)]
struct SnapshotShape {
    downloads: Vec<(u8, u8)>,
    /// (download index, user index, age index); indexes may dangle
    signups: Vec<(usize, usize, u8)>,
    rides: Vec<RideShape>,
    /// (ride index, status, amount cents)
    transactions: Vec<(usize, u8, u32)>,
    reviews: Vec<usize>,
}

fn ride_shape() -> impl Strategy<Value = RideShape> {
    (0usize..12, any::<bool>(), any::<bool>(), prop::option::of(-5i64..40)).prop_map(
        |(user, accepted, completed, cancel_after)| RideShape {
            user,
            accepted,
            completed,
            cancel_after,
        },
    )
}

fn snapshot_shape() -> impl Strategy<Value = SnapshotShape> {
    (
        prop::collection::vec((0u8..4, 0u8..3), 0..12),
        prop::collection::vec((0usize..14, 0usize..12, 0u8..4), 0..12),
        prop::collection::vec(ride_shape(), 0..16),
        prop::collection::vec((0usize..18, 0u8..3, 0u32..5000), 0..20),
        prop::collection::vec(0usize..18, 0..12),
    )
        .prop_map(|(downloads, signups, rides, transactions, reviews)| SnapshotShape {
            downloads,
            signups,
            rides,
            transactions,
            reviews,
        })
}

fn build(shape: &SnapshotShape) -> EntitySnapshot {
    let platforms = [Some(Platform::Ios), Some(Platform::Android), Some(Platform::Web), None];
    let ages = [Some("18-24"), Some("25-34"), Some("35-44"), None];
    let statuses = [
        ChargeStatus::Approved,
        ChargeStatus::Denied,
        ChargeStatus::Other("pending".to_string()),
    ];

    let mut builder = SnapshotBuilder::new();
    for (i, (platform, day)) in shape.downloads.iter().enumerate() {
        builder = builder.with_download_on_day(
            &format!("d{}", i),
            platforms[*platform as usize],
            *day as i64,
        );
    }
    for (download, user, age) in &shape.signups {
        builder = builder.with_signup(
            &format!("d{}", download),
            &format!("u{}", user),
            ages[*age as usize],
        );
    }
    for (i, ride) in shape.rides.iter().enumerate() {
        let mut b = RideBuilder::new(&format!("r{}", i), &format!("u{}", ride.user));
        if ride.accepted {
            b = b.accepted(1);
        }
        if ride.completed {
            b = b.picked_up(3).dropped_off(15);
        }
        if let Some(after) = ride.cancel_after {
            b = b.cancelled(after);
        }
        builder = builder.with_ride(b.build());
    }
    for (ride, status, cents) in &shape.transactions {
        builder = builder.with_transaction(
            &format!("r{}", ride),
            statuses[*status as usize].clone(),
            *cents as f64 / 100.0,
        );
    }
    for (i, ride) in shape.reviews.iter().enumerate() {
        builder = builder.with_review(&format!("r{}", ride), &format!("u{}", i), 4);
    }
    builder.build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lineage_preserves_downloads(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();

        prop_assert!(lineage.len() >= snapshot.downloads.len());
        prop_assert_eq!(lineage.stats.downloads, snapshot.downloads.len());
        for download in &snapshot.downloads {
            prop_assert!(lineage.iter().any(|r| r.download_key() == download.download_key));
        }
    }

    #[test]
    fn prop_unique_count_bounded_by_downloads(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();

        for dimensions in DIMENSION_SETS {
            let rows = Aggregator::new(dimensions).aggregate(&lineage.rows);
            prop_assert_eq!(rows.len() % FunnelStage::COUNT, 0);

            for partition in rows.chunks(FunnelStage::COUNT) {
                let base = partition[0].unique_count;
                prop_assert_eq!(partition[0].stage, FunnelStage::Download);
                for row in partition {
                    prop_assert!(row.unique_count <= base, "{:?}", row);
                    prop_assert!(row.unique_count <= row.event_count);
                }
            }
        }
    }

    #[test]
    fn prop_conversion_laws(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();

        for dimensions in DIMENSION_SETS {
            let rows = Aggregator::new(dimensions).aggregate(&lineage.rows);
            let conversions = ConversionCalculator::new().from_aggregates(&rows, |r| r.unique_count);
            assert_conversion_laws(&conversions);
        }
    }

    #[test]
    fn prop_parallel_equals_sequential(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();

        for dimensions in DIMENSION_SETS {
            let sequential = Aggregator::new(dimensions)
                .with_parallel(ParallelConfig::default().enabled(false))
                .run(&lineage.rows);
            let parallel = Aggregator::new(dimensions)
                .with_parallel(ParallelConfig::default().min_rows(1))
                .run(&lineage.rows);

            prop_assert_eq!(&sequential.stages, &parallel.stages);
            prop_assert_eq!(&sequential.payments, &parallel.payments);
        }
    }

    #[test]
    fn prop_rollup_agrees_with_lineage(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();

        let rollup: Vec<u64> = funnel_steps(&snapshot).iter().map(|r| r.value).collect();
        let aggregated: Vec<u64> = general_funnel(&lineage, &ParallelConfig::default())
            .iter()
            .map(|r| r.value)
            .collect();

        if snapshot.downloads.is_empty() {
            prop_assert!(aggregated.is_empty());
            prop_assert!(rollup.iter().all(|v| *v == 0));
        } else {
            prop_assert_eq!(rollup, aggregated);
        }
    }

    #[test]
    fn prop_fare_counts_each_approved_transaction_once(shape in snapshot_shape()) {
        let snapshot = build(&shape);
        let lineage = JoinResolver::new(&snapshot).resolve();
        let rows = Aggregator::new(DimensionSet::None).aggregate(&lineage.rows);

        let mut attached: Vec<(u64, f64)> = lineage
            .iter()
            .filter_map(|r| r.transaction)
            .filter(|t| t.charge_status.is_approved())
            .map(|t| (t.transaction_seq, t.purchase_amount))
            .collect();
        attached.sort_by_key(|(seq, _)| *seq);
        attached.dedup_by_key(|(seq, _)| *seq);
        let expected: f64 = attached.iter().map(|(_, amount)| amount).sum();

        let fare = rows
            .iter()
            .find(|r| r.stage == FunnelStage::Payment)
            .map(|r| r.sum_metric)
            .unwrap_or(0.0);
        prop_assert!((fare - expected).abs() < 1e-9, "fare {} expected {}", fare, expected);
    }
}
