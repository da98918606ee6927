//! Engine configuration
//!
//! Two entry points:
//! - Builder: `FunnelConfig::default().parallel(|c| c.min_rows(1000)).build()?`
//! - YAML v1: `FunnelConfig::from_yaml("funnel.yaml")?`
//!
//! ```yaml
//! version: 1
//! reports: [general_funnel, funnel_by_age_range]
//! parallel:
//!   enabled: true
//!   min_rows: 50000
//!   num_threads: 0
//! wait_buckets:
//!   bounds_minutes: [2, 5, 10, 15, 20]
//! ```

pub mod error;
pub mod funnel_config;
pub mod io;
pub mod report_kind;
pub mod stage_configs;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use funnel_config::{FunnelConfig, ValidatedConfig, SUPPORTED_VERSIONS};
pub use io::ConfigExportV1;
pub use report_kind::ReportKind;
pub use stage_configs::{ParallelConfig, WaitBucketConfig};
pub use validation::{Validatable, ValidatableCollection};
