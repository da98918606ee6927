//! Pipeline orchestration

mod funnel_pipeline;

pub use funnel_pipeline::FunnelPipeline;
