//! Mergeable accumulators
//!
//! Every field merges associatively and commutatively (counter add, set
//! union, map union), so fold/reduce over any partition of the rows gives
//! the same result as a single sequential pass.

use rustc_hash::{FxHashMap, FxHashSet};

use funnel_storage::ChargeStatus;

use crate::features::lineage::LineageRow;
use crate::features::stage_classifier::{classify, FunnelStage};

/// Metrics for one stage (or one payment sub-group) of one group
#[derive(Debug, Clone, Default)]
pub(crate) struct StageAccumulator<'a> {
    pub events: u64,
    /// DISTINCT download (session) keys
    pub identities: FxHashSet<&'a str>,
    pub rides: FxHashSet<&'a str>,
    /// transaction_seq → purchase_amount
    pub amounts: FxHashMap<u64, f64>,
}

impl<'a> StageAccumulator<'a> {
    fn add(&mut self, row: &LineageRow<'a>, stage: FunnelStage) {
        self.events += 1;

        // Download key at every stage keeps each stage a subset of stage 0
        self.identities.insert(row.download_key());

        if stage.counts_rides() {
            if let Some(ride_id) = row.ride_id() {
                self.rides.insert(ride_id);
            }
        }

        if stage == FunnelStage::Payment {
            if let Some(t) = row.transaction {
                self.amounts.insert(t.transaction_seq, t.purchase_amount);
            }
        }
    }

    fn merge(&mut self, other: StageAccumulator<'a>) {
        self.events += other.events;
        self.identities.extend(other.identities);
        self.rides.extend(other.rides);
        self.amounts.extend(other.amounts);
    }

    /// Sum of distinct amounts in transaction order
    pub fn amount(&self) -> f64 {
        let mut seqs: Vec<_> = self.amounts.iter().collect();
        seqs.sort_unstable_by_key(|(seq, _)| **seq);
        seqs.into_iter().map(|(_, amount)| *amount).sum()
    }
}

/// All stage accumulators of one dimension group
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupAccumulator<'a> {
    /// Stages 0..=6 except payment, which lives in `payments`
    pub stages: [StageAccumulator<'a>; FunnelStage::COUNT],
    pub payments: FxHashMap<ChargeStatus, StageAccumulator<'a>>,
}

impl<'a> GroupAccumulator<'a> {
    pub fn add(&mut self, row: &LineageRow<'a>) {
        for stage in classify(row).iter() {
            if stage != FunnelStage::Payment {
                self.stages[stage.index()].add(row, stage);
            }
        }

        if let Some(t) = row.transaction {
            self.payments
                .entry(t.charge_status.clone())
                .or_default()
                .add(row, FunnelStage::Payment);
        }
    }

    pub fn merge(&mut self, other: GroupAccumulator<'a>) {
        for (mine, theirs) in self.stages.iter_mut().zip(other.stages) {
            mine.merge(theirs);
        }
        for (status, acc) in other.payments {
            self.payments.entry(status).or_default().merge(acc);
        }
    }

    /// Accumulator surfaced for `stage`; payment reads the Approved sub-group
    pub fn stage(&self, stage: FunnelStage) -> Option<&StageAccumulator<'a>> {
        match stage {
            FunnelStage::Payment => self.payments.get(&ChargeStatus::Approved),
            _ => Some(&self.stages[stage.index()]),
        }
    }
}
