//! # Scene Graph Module
//!
//! Hierarchical scene management: every node carries a local [`Transform`]
//! relative to its parent, and drawing a root composes those transforms
//! top-down before handing the result to each node's [`Renderable`].
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Arena that owns every node and runs the traversal
//! - [`SceneNode`] - One node: optional renderable, transform, parent, children
//! - [`Transform`] - Translation / rotation / scale producing a 4x4 matrix
//! - [`DrawMatrices`] - The MVP, model-view, normal and model matrices
//! - [`Renderable`] - Drawing contract implemented by the GPU mesh drawer
//!
//! ## Usage
//!
//! ```
//! use cgmath::Vector3;
//! use trellis::scene::{DrawMatrices, SceneGraph, Transform};
//!
//! let mut graph = SceneGraph::new();
//! let sun = graph.add_root(None, Transform::identity()).unwrap();
//! let earth = graph
//!     .add_node(None, Transform::from_translation(Vector3::new(6.0, 0.0, 0.0)), Some(sun))
//!     .unwrap();
//! graph
//!     .add_node(None, Transform::from_scale(0.3), Some(earth))
//!     .unwrap();
//!
//! let stats = graph.draw(sun, &DrawMatrices::identity()).unwrap();
//! assert_eq!(stats.nodes_visited, 3);
//! ```

pub mod error;
pub mod graph;
pub mod matrices;
pub mod node;
pub mod renderable;
pub mod transform;

pub use error::SceneError;
pub use graph::{Ancestors, DrawStats, SceneGraph};
pub use matrices::DrawMatrices;
pub use node::{NodeId, SceneNode, SceneNodeBuilder};
pub use renderable::Renderable;
pub use transform::{Rotation, Transform};
