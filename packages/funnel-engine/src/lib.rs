/*
 * Funnel Engine - ride funnel analytics
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Error model, ratio/percent helpers
 * - config/      : FunnelConfig (builder + YAML v1)
 * - features/    : Vertical slices (lineage → stage_classifier → aggregation → conversion → reports)
 * - pipeline/    : Orchestration (snapshot → lineage → reports)
 * - output/      : Result table export
 *
 * Performance:
 * - Rayon fold/reduce over dimension groups
 * - FxHash indexes and DISTINCT sets
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (builder + YAML)
pub mod config;

/// Feature slices
pub mod features;

/// Result table export
pub mod output;

/// Pipeline orchestration
pub mod pipeline;

/// Shared models and utilities
pub mod shared;

pub use config::{FunnelConfig, ReportKind, ValidatedConfig};
pub use features::aggregation::{Aggregator, DimensionKey, DimensionSet, StageAggregate};
pub use features::conversion::{ConversionCalculator, ConversionRow};
pub use features::lineage::{JoinResolver, JoinStats, LineageRow, LineageTable};
pub use features::reports::{ReportSet, ReportTable};
pub use features::stage_classifier::{classify, FunnelStage, StageSet};
pub use output::JsonReporter;
pub use pipeline::FunnelPipeline;
pub use shared::models::{ErrorKind, FunnelError, Result};

/// Initialize the global Rayon pool once
///
/// `num_threads = 0` uses 75% of available cores. Later calls are no-ops;
/// if another component already built the global pool it is kept.
pub fn init_thread_pool(num_threads: usize) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let cpus = num_cpus::get();
        let threads = if num_threads == 0 {
            std::cmp::max(1, (cpus * 3) / 4)
        } else {
            num_threads
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            Ok(()) => tracing::info!(threads, cpus, "rayon pool initialized"),
            Err(e) => tracing::warn!(error = %e, "rayon pool already initialized"),
        }
    });
}
