//! Reports - one pure function per result table
//!
//! Builders read the loaded snapshot and, for funnel-style tables, the
//! lineage table shared across reports in a run.

pub mod application;
pub mod domain;

pub use application::{build_report, ReportContext};
pub use domain::{
    AgeRangeFunnelRow, ApprovedRideAveragesRow, CancelWaitRow, FunnelDimensionRow,
    FunnelStepRow, GeneralFunnelRow, PlatformDistributionRow, PlatformFunnelRow, ReportSet,
    ReportTable,
};
