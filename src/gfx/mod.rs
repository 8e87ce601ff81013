//! # Graphics Module
//!
//! The wgpu side of the crate: everything that turns a scene graph
//! traversal into pixels.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera supplying the root matrices
//! - **Rendering Pipeline** ([`rendering`]) - Phong pipeline and frame rendering
//! - **Mesh Drawing** ([`mesh_drawer`], [`draw_queue`]) - GPU [`Renderable`] and its per-frame draw list
//! - **Mesh & Texture Data** ([`mesh`], [`texture`], [`geometry`]) - CPU-side inputs to the drawer
//! - **Resource Management** ([`resources`]) - Textures, samplers and shading uniforms
//!
//! ## Usage
//!
//! ```no_run
//! # fn build(engine: &trellis::gfx::RenderEngine) -> Result<(), Box<dyn std::error::Error>> {
//! use trellis::gfx::geometry::generate_sphere;
//! use trellis::scene::Renderable;
//!
//! let mesh = generate_sphere(32, 16).to_mesh_data();
//! let mut drawer = engine.create_mesh_drawer(false);
//! drawer.set_mesh(&mesh.positions, &mesh.tex_coords, &mesh.normals)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Renderable`]: crate::scene::Renderable

pub mod camera;
pub mod draw_queue;
pub mod geometry;
pub mod mesh;
pub mod mesh_drawer;
pub mod rendering;
pub mod resources;
pub mod texture;
pub mod vertex;

pub use camera::orbit_camera::OrbitCamera;
pub use mesh::{MeshData, MeshError};
pub use mesh_drawer::{DrawerContext, MeshDrawer};
pub use rendering::render_engine::{RenderEngine, RenderError};
pub use texture::{TextureError, TextureImage};
