//! Report table schemas

mod report_set;
mod rows;

pub use report_set::{ReportSet, ReportTable};
pub use rows::{
    AgeRangeFunnelRow, ApprovedRideAveragesRow, CancelWaitRow, FunnelDimensionRow,
    FunnelStepRow, GeneralFunnelRow, PlatformDistributionRow, PlatformFunnelRow,
};
