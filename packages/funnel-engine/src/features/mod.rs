//! Feature slices, leaves first:
//! lineage → stage_classifier → aggregation → conversion → reports

pub mod aggregation;
pub mod conversion;
pub mod lineage;
pub mod reports;
pub mod stage_classifier;
