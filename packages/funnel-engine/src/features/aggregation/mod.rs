//! Aggregation - per (dimension tuple, stage) metrics over lineage rows
//!
//! # Metrics
//!
//! | Metric | Counted over | DISTINCT key |
//! |---|---|---|
//! | `event_count` | rows satisfying the stage | none (fan-out counted) |
//! | `unique_count` | rows satisfying the stage | download_key at stage 0, user_id after |
//! | `secondary_count` | stages 2..=6 | ride_id |
//! | `sum_metric` | stage 5 | transaction_seq |
//!
//! The payment stage is accumulated per charge status; only the Approved
//! sub-group surfaces as stage 5.

pub mod domain;
pub mod infrastructure;

pub use domain::{DimensionKey, DimensionSet, PaymentBreakdown, StageAggregate};
pub use infrastructure::{Aggregation, Aggregator};
