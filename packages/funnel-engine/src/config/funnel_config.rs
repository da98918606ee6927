//! Top-level engine configuration and builder

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigExportV1;
use super::report_kind::ReportKind;
use super::stage_configs::{ParallelConfig, WaitBucketConfig};
use super::validation::Validatable;

/// Supported YAML schema versions
pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Engine configuration (unvalidated)
///
/// # Example
/// ```ignore
/// let config = FunnelConfig::default()
///     .reports(vec![ReportKind::GeneralFunnel, ReportKind::FunnelByAgeRange])
///     .parallel(|c| c.min_rows(10_000))
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelConfig {
    /// Reports to produce, in output order
    pub reports: Vec<ReportKind>,
    pub parallel: ParallelConfig,
    pub wait_buckets: WaitBucketConfig,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            reports: ReportKind::ALL.to_vec(),
            parallel: ParallelConfig::default(),
            wait_buckets: WaitBucketConfig::default(),
        }
    }
}

impl FunnelConfig {
    /// Replace the report selection
    pub fn reports(mut self, reports: Vec<ReportKind>) -> Self {
        self.reports = reports;
        self
    }

    /// Override parallelism settings
    ///
    /// ```ignore
    /// FunnelConfig::default().parallel(|c| c.enabled(false));
    /// ```
    pub fn parallel(mut self, f: impl FnOnce(ParallelConfig) -> ParallelConfig) -> Self {
        self.parallel = f(self.parallel);
        self
    }

    /// Override histogram bucket bounds
    pub fn wait_buckets(mut self, f: impl FnOnce(WaitBucketConfig) -> WaitBucketConfig) -> Self {
        self.wait_buckets = f(self.wait_buckets);
        self
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        self.validate()?;
        Ok(ValidatedConfig(self))
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: &str) -> ConfigResult<ValidatedConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML document (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<ValidatedConfig> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();

        if let Some(names) = export.reports {
            config.reports = names
                .iter()
                .map(|name| ReportKind::from_str(name))
                .collect::<ConfigResult<Vec<_>>>()?;
        }
        if let Some(parallel) = export.parallel {
            config.parallel = parallel;
        }
        if let Some(wait_buckets) = export.wait_buckets {
            config.wait_buckets = wait_buckets;
        }

        config.build()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            reports: Some(self.reports.iter().map(|r| r.as_str().to_string()).collect()),
            parallel: Some(self.parallel.clone()),
            wait_buckets: Some(self.wait_buckets.clone()),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }

    /// Human-readable one-line summary
    pub fn describe(&self) -> String {
        let reports: Vec<&str> = self.reports.iter().map(|r| r.as_str()).collect();
        let parallel = if self.parallel.enabled {
            format!("parallel>={}", self.parallel.min_rows)
        } else {
            "sequential".to_string()
        };
        format!("[{}] {}", reports.join(", "), parallel)
    }
}

impl Validatable for FunnelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.reports.is_empty() {
            return Err(ConfigError::Validation(
                "reports must name at least one report".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for report in &self.reports {
            if !seen.insert(report) {
                return Err(ConfigError::Validation(format!(
                    "report '{}' listed more than once",
                    report
                )));
            }
        }

        self.parallel.validate()?;
        self.wait_buckets.validate()?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "funnel"
    }
}

/// Validated configuration (immutable, safe to use)
#[derive(Debug, Clone)]
pub struct ValidatedConfig(FunnelConfig);

impl ValidatedConfig {
    /// Unwrap the validated config to get the inner FunnelConfig
    pub fn into_inner(self) -> FunnelConfig {
        self.0
    }

    /// Get a reference to the inner FunnelConfig
    pub fn as_inner(&self) -> &FunnelConfig {
        &self.0
    }

    pub fn reports(&self) -> &[ReportKind] {
        &self.0.reports
    }

    pub fn parallel(&self) -> &ParallelConfig {
        &self.0.parallel
    }

    pub fn wait_buckets(&self) -> &WaitBucketConfig {
        &self.0.wait_buckets
    }

    /// True if any selected report reads the lineage table
    pub fn needs_lineage(&self) -> bool {
        self.0.reports.iter().any(|r| r.uses_lineage())
    }

    pub fn describe(&self) -> String {
        self.0.describe()
    }
}
