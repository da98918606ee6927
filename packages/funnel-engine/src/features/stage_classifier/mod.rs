//! Stage Classifier - per-row existence predicates
//!
//! | Stage | Name | Satisfied when |
//! |---|---|---|
//! | 0 | download | always |
//! | 1 | signup | signup present |
//! | 2 | ride_requested | ride present |
//! | 3 | ride_accepted | accept_timestamp present |
//! | 4 | ride_completed | dropoff_timestamp present |
//! | 5 | payment | transaction approved |
//! | 6 | review | review present |
//!
//! Predicates are independent: a row may satisfy stage 6 without stage 3.

mod classifier;
mod stage;

pub use classifier::{classify, furthest_stage, satisfies};
pub use stage::{FunnelStage, StageSet};
