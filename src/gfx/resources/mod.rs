//! GPU resource management
//!
//! Handles textures, samplers and the shading uniform bind group.

pub mod shading_bindings;
pub mod texture_resource;

pub use shading_bindings::{ShadingBindings, ShadingUniform};
pub use texture_resource::TextureResource;
