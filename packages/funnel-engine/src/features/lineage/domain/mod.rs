//! Lineage domain types

mod models;

pub use models::{JoinStats, LineageRow, LineageTable};
