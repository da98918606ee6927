//! Step-over-step and first-step-relative conversion
//!
//! Within a partition ordered by stage:
//! - `step_conversion[i] = value[i] / value[i-1]`, `None` at i = 0
//! - `overall_conversion[i] = value[i] / value[0]`, exactly 1 at i = 0
//!
//! A zero denominator gives `None`, never NaN or infinity.

use serde::Serialize;

use crate::features::aggregation::{DimensionKey, StageAggregate};
use crate::features::stage_classifier::FunnelStage;
use crate::shared::utils::safe_ratio;

/// One (partition, stage) value with its ratios
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRow {
    pub key: DimensionKey,
    pub stage: FunnelStage,
    pub value: u64,
    pub step_conversion: Option<f64>,
    pub overall_conversion: Option<f64>,
}

/// Windowed ratio calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionCalculator;

impl ConversionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute ratios for `(key, stage, value)` triples in any order
    ///
    /// Output is sorted by (key, stage); partitions are contiguous.
    pub fn compute<I>(&self, values: I) -> Vec<ConversionRow>
    where
        I: IntoIterator<Item = (DimensionKey, FunnelStage, u64)>,
    {
        let mut values: Vec<_> = values.into_iter().collect();
        values.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut out: Vec<ConversionRow> = Vec::with_capacity(values.len());
        let mut first: Option<u64> = None;
        let mut previous: Option<u64> = None;

        for (key, stage, value) in values {
            let new_partition = out.last().map_or(true, |last| last.key != key);
            if new_partition {
                first = Some(value);
                previous = None;
            }

            let step_conversion =
                previous.and_then(|prev| safe_ratio(value as f64, prev as f64));
            let overall_conversion = if new_partition {
                Some(1.0)
            } else {
                first.and_then(|base| safe_ratio(value as f64, base as f64))
            };

            out.push(ConversionRow {
                key,
                stage,
                value,
                step_conversion,
                overall_conversion,
            });
            previous = Some(value);
        }

        out
    }

    /// Ratios over aggregator output using `metric` as the value column
    pub fn from_aggregates(
        &self,
        rows: &[StageAggregate],
        metric: impl Fn(&StageAggregate) -> u64,
    ) -> Vec<ConversionRow> {
        self.compute(rows.iter().map(|r| (r.key.clone(), r.stage, metric(r))))
    }
}
