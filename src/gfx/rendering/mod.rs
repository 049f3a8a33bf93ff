// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, mesh upload and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod renderer;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::RenderEngine;
pub use renderer::{submit, MeshAssets, MeshHandle, Renderer};
