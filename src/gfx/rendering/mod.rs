// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, the surface and frame submission.

pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{scene_pipeline_for, RenderEngine};
