//! # Procedural Geometry Generation
//!
//! Generates primitive shapes without external model files. Shapes are
//! built indexed and expanded into flat [`MeshData`] for the mesh drawer.
//!
//! ## Usage
//!
//! ```rust
//! use trellis::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube().to_mesh_data();
//! assert_eq!(cube.vertex_count(), 36);
//!
//! let sphere = generate_sphere(32, 16).to_mesh_data();
//! assert_eq!(sphere.vertex_count(), 32 * (16 - 1) * 6);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::mesh::MeshData;

/// Indexed geometry as produced by the generators
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expands the indices into one vertex per triangle corner
    pub fn to_mesh_data(&self) -> MeshData {
        let mut mesh = MeshData::default();
        mesh.positions.reserve(self.indices.len() * 3);
        mesh.tex_coords.reserve(self.indices.len() * 2);
        mesh.normals.reserve(self.indices.len() * 3);

        for &index in &self.indices {
            let i = index as usize;
            mesh.positions.extend_from_slice(&self.vertices[i]);
            mesh.tex_coords
                .extend_from_slice(&self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]));
            mesh.normals
                .extend_from_slice(&self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]));
        }

        mesh
    }
}
