//! Lineage - left-joined journey rows
//!
//! ```text
//! Download ⟕ Signup (session_key) ⟕ RideRequest (user_id)
//!          ⟕ Transaction (ride_id) ⟕ Review (ride_id)
//! ```
//!
//! Every download yields at least one row. One-to-many joins fan out and are
//! never de-duplicated here; the aggregator declares DISTINCT keys per metric.

pub mod domain;
pub mod infrastructure;

pub use domain::{JoinStats, LineageRow, LineageTable};
pub use infrastructure::JoinResolver;
