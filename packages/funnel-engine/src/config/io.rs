//! Configuration I/O (YAML loading)
//!
//! Defines YAML schema types. Loading and export live in funnel_config.rs.

use super::stage_configs::{ParallelConfig, WaitBucketConfig};
use serde::{Deserialize, Serialize};

/// YAML Schema v1
///
/// Report names stay strings here so unknown names surface as
/// `ConfigError::UnknownReport` with a suggestion instead of a serde error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Reports to produce, in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_buckets: Option<WaitBucketConfig>,
}
