//! # Trellis Prelude
//!
//! Commonly used types for building and drawing a scene.
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let mut scene = SceneGraph::with_config(SceneConfig::default());
//! let root = scene.add_root(None, Transform::identity()).unwrap();
//! assert!(scene.draw(root, &DrawMatrices::identity()).is_ok());
//! ```

pub use crate::app::{SceneApp, TrellisApp};
pub use crate::config::{AppConfig, CameraConfig, NormalMatrixMode, SceneConfig, ShadingConfig, TraversalMode};
pub use crate::gfx::{
    geometry::{generate_cube, generate_sphere},
    MeshData, MeshDrawer, RenderEngine, TextureImage,
};
pub use crate::scene::{
    DrawMatrices, NodeId, Renderable, Rotation, SceneError, SceneGraph, SceneNode, Transform,
};

pub use cgmath::{Deg, Quaternion, Rad, Vector3};
