//! Aggregation domain types

mod dimension;
mod models;

pub use dimension::{DimensionKey, DimensionSet};
pub use models::{PaymentBreakdown, StageAggregate};
