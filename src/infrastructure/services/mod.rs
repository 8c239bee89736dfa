//! Application services

pub mod pipeline_service;

pub use pipeline_service::{Outcome, PipelineConfig, PipelineResult, PipelineService};
