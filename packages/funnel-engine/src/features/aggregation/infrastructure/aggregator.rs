//! Aggregator - groups lineage rows by dimension tuple and stage
//!
//! # Algorithm
//! 1. Key each row by its dimension tuple (before stage filtering)
//! 2. Fold rows into per-group accumulators, sequentially or with rayon
//!    fold/reduce when the row count reaches the parallel threshold
//! 3. Emit all seven stage rows for every group, sorted by (key, stage)

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::ParallelConfig;
use crate::features::aggregation::domain::{
    DimensionKey, DimensionSet, PaymentBreakdown, StageAggregate,
};
use crate::features::lineage::LineageRow;
use crate::features::stage_classifier::FunnelStage;

use super::accumulator::GroupAccumulator;

type Groups<'a> = FxHashMap<DimensionKey, GroupAccumulator<'a>>;

/// Stage rows plus the per-charge-status payment sub-groups
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub stages: Vec<StageAggregate>,
    pub payments: Vec<PaymentBreakdown>,
}

impl Aggregation {
    /// Rows of one partition, in stage order
    pub fn partition<'s>(&'s self, key: &'s DimensionKey) -> impl Iterator<Item = &'s StageAggregate> {
        self.stages.iter().filter(move |row| &row.key == key)
    }
}

/// Funnel aggregator for one dimension set
///
/// # Example
/// ```ignore
/// let rows = Aggregator::new(DimensionSet::AgeRange)
///     .with_parallel(config.parallel().clone())
///     .aggregate(&lineage.rows);
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator {
    dimensions: DimensionSet,
    parallel: ParallelConfig,
}

impl Aggregator {
    pub fn new(dimensions: DimensionSet) -> Self {
        Self {
            dimensions,
            parallel: ParallelConfig::default(),
        }
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn dimensions(&self) -> DimensionSet {
        self.dimensions
    }

    /// Stage rows sorted by (dimension tuple, stage)
    pub fn aggregate(&self, rows: &[LineageRow<'_>]) -> Vec<StageAggregate> {
        self.run(rows).stages
    }

    /// Payment sub-groups for every charge status, sorted by (key, status)
    pub fn payment_breakdown(&self, rows: &[LineageRow<'_>]) -> Vec<PaymentBreakdown> {
        self.run(rows).payments
    }

    /// Stage rows and payment sub-groups from one pass
    pub fn run(&self, rows: &[LineageRow<'_>]) -> Aggregation {
        let groups = if self.parallel.should_parallelize(rows.len()) {
            debug!(
                dimensions = self.dimensions.as_str(),
                rows = rows.len(),
                "aggregating in parallel"
            );
            self.group_parallel(rows)
        } else {
            self.group_sequential(rows)
        };

        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut aggregation = Aggregation {
            stages: Vec::with_capacity(groups.len() * FunnelStage::COUNT),
            payments: Vec::new(),
        };

        for (key, group) in groups {
            for stage in FunnelStage::ALL {
                aggregation.stages.push(stage_row(&key, &group, stage));
            }

            let mut payments: Vec<_> = group.payments.iter().collect();
            payments.sort_by(|a, b| a.0.cmp(b.0));
            for (status, acc) in payments {
                aggregation.payments.push(PaymentBreakdown {
                    key: key.clone(),
                    charge_status: status.clone(),
                    event_count: acc.events,
                    unique_users: acc.identities.len() as u64,
                    ride_count: acc.rides.len() as u64,
                    amount: acc.amount(),
                });
            }
        }

        debug!(
            dimensions = self.dimensions.as_str(),
            groups = aggregation.stages.len() / FunnelStage::COUNT,
            "aggregation complete"
        );

        aggregation
    }

    fn group_sequential<'a>(&self, rows: &[LineageRow<'a>]) -> Groups<'a> {
        let mut groups = Groups::default();
        for row in rows {
            groups
                .entry(self.dimensions.key(row))
                .or_default()
                .add(row);
        }
        groups
    }

    fn group_parallel<'a>(&self, rows: &[LineageRow<'a>]) -> Groups<'a> {
        rows.par_iter()
            .fold(Groups::default, |mut groups, row| {
                groups
                    .entry(self.dimensions.key(row))
                    .or_default()
                    .add(row);
                groups
            })
            .reduce(Groups::default, merge_groups)
    }
}

fn merge_groups<'a>(mut left: Groups<'a>, right: Groups<'a>) -> Groups<'a> {
    for (key, group) in right {
        match left.get_mut(&key) {
            Some(existing) => existing.merge(group),
            None => {
                left.insert(key, group);
            }
        }
    }
    left
}

fn stage_row(key: &DimensionKey, group: &GroupAccumulator<'_>, stage: FunnelStage) -> StageAggregate {
    let mut row = StageAggregate::empty(key.clone(), stage);
    if let Some(acc) = group.stage(stage) {
        row.event_count = acc.events;
        row.unique_count = acc.identities.len() as u64;
        row.secondary_count = if stage.counts_rides() {
            acc.rides.len() as u64
        } else {
            0
        };
        row.sum_metric = if stage == FunnelStage::Payment {
            acc.amount()
        } else {
            0.0
        };
    }
    row
}
