//! Aggregation infrastructure

mod accumulator;
mod aggregator;

pub use aggregator::{Aggregation, Aggregator};
