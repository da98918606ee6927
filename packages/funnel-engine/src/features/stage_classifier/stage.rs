//! Funnel stage ordinals and the per-row stage bitset

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal position in the ride journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    Download = 0,
    Signup = 1,
    RideRequested = 2,
    RideAccepted = 3,
    RideCompleted = 4,
    Payment = 5,
    Review = 6,
}

impl FunnelStage {
    pub const COUNT: usize = 7;

    pub const ALL: [FunnelStage; Self::COUNT] = [
        FunnelStage::Download,
        FunnelStage::Signup,
        FunnelStage::RideRequested,
        FunnelStage::RideAccepted,
        FunnelStage::RideCompleted,
        FunnelStage::Payment,
        FunnelStage::Review,
    ];

    /// Stage ordinal (0..=6)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// `funnel_name` column value
    pub fn name(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Signup => "signup",
            Self::RideRequested => "ride_requested",
            Self::RideAccepted => "ride_accepted",
            Self::RideCompleted => "ride_completed",
            Self::Payment => "payment",
            Self::Review => "review",
        }
    }

    /// `funnel_metric` column value (what the unique count measures)
    pub fn metric_label(self) -> &'static str {
        match self {
            Self::Download => "downloads",
            Self::Signup => "signups",
            Self::RideRequested => "ride_requesters",
            Self::RideAccepted => "accepted_riders",
            Self::RideCompleted => "completed_riders",
            Self::Payment => "paying_riders",
            Self::Review => "reviewers",
        }
    }

    /// Stages from which a ride id is counted as the secondary metric
    pub fn counts_rides(self) -> bool {
        self >= Self::RideRequested
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of stages a lineage row satisfies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StageSet(u8);

impl StageSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, stage: FunnelStage) {
        self.0 |= 1 << stage.index();
    }

    pub fn with(mut self, stage: FunnelStage) -> Self {
        self.insert(stage);
        self
    }

    pub fn contains(&self, stage: FunnelStage) -> bool {
        self.0 & (1 << stage.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Satisfied stages in ascending order
    pub fn iter(&self) -> impl Iterator<Item = FunnelStage> + '_ {
        FunnelStage::ALL.into_iter().filter(move |s| self.contains(*s))
    }

    /// Highest satisfied stage
    pub fn max(&self) -> Option<FunnelStage> {
        self.iter().last()
    }
}

impl FromIterator<FunnelStage> for StageSet {
    fn from_iter<I: IntoIterator<Item = FunnelStage>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}
