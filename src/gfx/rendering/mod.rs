//! Core rendering functionality
//!
//! Handles the Phong render pipeline, GPU resource management, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, RenderError};
