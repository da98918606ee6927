//! Per-component configuration blocks

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

/// Parallelism Configuration (aggregation map-reduce)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Use the rayon pool for dimension-group aggregation
    pub enabled: bool,

    /// Minimum lineage rows before the parallel path is taken (>= 1)
    pub min_rows: usize,

    /// Worker threads (0 = auto, 75% of cores; max 1024)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_rows: 50_000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Whether `rows` lineage rows should be aggregated on the rayon pool
    pub fn should_parallelize(&self, rows: usize) -> bool {
        self.enabled && rows >= self.min_rows
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.min_rows < 1 {
            return Err(ConfigError::range_with_hint(
                "parallel.min_rows",
                self.min_rows,
                1,
                usize::MAX,
                "Parallel threshold must be at least one row",
            ));
        }

        if self.num_threads > 1024 {
            return Err(ConfigError::range_with_hint(
                "parallel.num_threads",
                self.num_threads,
                0,
                1024,
                "Number of threads must be reasonable (0=auto)",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "parallel"
    }
}

/// Wait-before-cancel histogram buckets
///
/// Bounds `[2, 5, 10]` produce `0-2 min`, `2-5 min`, `5-10 min`, `10+ min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitBucketConfig {
    /// Upper bucket bounds in minutes, strictly increasing, each in 1..=1440
    pub bounds_minutes: Vec<u32>,
}

impl Default for WaitBucketConfig {
    fn default() -> Self {
        Self {
            bounds_minutes: vec![2, 5, 10, 15, 20],
        }
    }
}

impl WaitBucketConfig {
    pub fn bounds(mut self, bounds_minutes: Vec<u32>) -> Self {
        self.bounds_minutes = bounds_minutes;
        self
    }
}

impl Validatable for WaitBucketConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.bounds_minutes.is_empty() {
            return Err(ConfigError::Validation(
                "wait_buckets.bounds_minutes must contain at least one bound".to_string(),
            ));
        }

        for bound in &self.bounds_minutes {
            if *bound < 1 || *bound > 1440 {
                return Err(ConfigError::range_with_hint(
                    "wait_buckets.bounds_minutes",
                    bound,
                    1,
                    1440,
                    "Bucket bounds are minutes within one day",
                ));
            }
        }

        if self.bounds_minutes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Validation(format!(
                "wait_buckets.bounds_minutes must be strictly increasing, got {:?}",
                self.bounds_minutes
            )));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "wait_buckets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_defaults_valid() {
        assert!(ParallelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parallel_threshold() {
        let cfg = ParallelConfig::default().min_rows(10);
        assert!(!cfg.should_parallelize(9));
        assert!(cfg.should_parallelize(10));
        assert!(!cfg.enabled(false).should_parallelize(1_000_000));
    }

    #[test]
    fn test_parallel_range_errors() {
        assert!(ParallelConfig::default().min_rows(0).validate().is_err());
        assert!(ParallelConfig::default().num_threads(2048).validate().is_err());
    }

    #[test]
    fn test_wait_buckets_validation() {
        assert!(WaitBucketConfig::default().validate().is_ok());
        assert!(WaitBucketConfig::default().bounds(vec![]).validate().is_err());
        assert!(WaitBucketConfig::default().bounds(vec![5, 5]).validate().is_err());
        assert!(WaitBucketConfig::default().bounds(vec![10, 2]).validate().is_err());
        assert!(WaitBucketConfig::default().bounds(vec![0, 2]).validate().is_err());
        assert!(WaitBucketConfig::default().bounds(vec![2000]).validate().is_err());
    }
}
