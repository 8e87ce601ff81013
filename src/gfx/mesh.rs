//! Flat, non-indexed triangle mesh data
//!
//! Meshes are stored the way the drawer consumes them: one entry per
//! vertex, three vertices per triangle, no index buffer.

use std::path::Path;

use log::{debug, warn};

use super::vertex::MeshVertex;

/// Mesh validation and loading errors
#[derive(thiserror::Error, Debug)]
pub enum MeshError {
    #[error("position array length {0} is not a multiple of 3")]
    InvalidPositions(usize),

    #[error("expected {expected} normal components, got {actual}")]
    NormalCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} texture coordinate components, got {actual}")]
    TexCoordCountMismatch { expected: usize, actual: usize },

    #[error("failed to load OBJ file: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("OBJ file '{0}' contains no geometry")]
    Empty(String),
}

/// Validated vertex arrays for one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Three floats per vertex
    pub positions: Vec<f32>,
    /// Two floats per vertex
    pub tex_coords: Vec<f32>,
    /// Three floats per vertex
    pub normals: Vec<f32>,
}

impl MeshData {
    /// Builds mesh data, checking that the three arrays describe the same vertices
    pub fn new(
        positions: Vec<f32>,
        tex_coords: Vec<f32>,
        normals: Vec<f32>,
    ) -> Result<Self, MeshError> {
        validate(&positions, &tex_coords, &normals)?;
        Ok(Self {
            positions,
            tex_coords,
            normals,
        })
    }

    /// Number of vertices, which is also the count handed to the draw call
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaves the arrays into GPU vertices
    pub fn to_vertices(&self) -> Vec<MeshVertex> {
        interleave(&self.positions, &self.tex_coords, &self.normals)
    }

    /// Loads every model of an OBJ file into a single flat mesh
    ///
    /// Missing normals are replaced with face normals and missing texture
    /// coordinates with zeros.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut positions = Vec::new();
        let mut tex_coords = Vec::new();
        let mut normals = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            let has_normals = mesh.normals.len() == mesh.positions.len();
            let has_tex_coords = mesh.texcoords.len() / 2 == mesh.positions.len() / 3;

            let start = positions.len();
            for &index in &mesh.indices {
                let i = index as usize;
                positions.extend_from_slice(&mesh.positions[i * 3..i * 3 + 3]);
                if has_tex_coords {
                    tex_coords.extend_from_slice(&mesh.texcoords[i * 2..i * 2 + 2]);
                } else {
                    tex_coords.extend_from_slice(&[0.0, 0.0]);
                }
                if has_normals {
                    normals.extend_from_slice(&mesh.normals[i * 3..i * 3 + 3]);
                }
            }

            if !has_normals {
                warn!("'{}' has no normals, using face normals", model.name);
                normals.extend(calculate_face_normals(&positions[start..]));
            }
        }

        if positions.is_empty() {
            return Err(MeshError::Empty(path.display().to_string()));
        }

        debug!(
            "Loaded {} ({} vertices from {} models)",
            path.display(),
            positions.len() / 3,
            models.len()
        );
        Self::new(positions, tex_coords, normals)
    }
}

/// Checks the array lengths against each other
pub fn validate(positions: &[f32], tex_coords: &[f32], normals: &[f32]) -> Result<(), MeshError> {
    if positions.len() % 3 != 0 {
        return Err(MeshError::InvalidPositions(positions.len()));
    }
    if normals.len() != positions.len() {
        return Err(MeshError::NormalCountMismatch {
            expected: positions.len(),
            actual: normals.len(),
        });
    }
    let expected = positions.len() / 3 * 2;
    if tex_coords.len() != expected {
        return Err(MeshError::TexCoordCountMismatch {
            expected,
            actual: tex_coords.len(),
        });
    }
    Ok(())
}

/// Interleaves already validated arrays
pub(crate) fn interleave(positions: &[f32], tex_coords: &[f32], normals: &[f32]) -> Vec<MeshVertex> {
    positions
        .chunks_exact(3)
        .zip(normals.chunks_exact(3))
        .zip(tex_coords.chunks_exact(2))
        .map(|((p, n), t)| MeshVertex {
            position: [p[0], p[1], p[2]],
            normal: [n[0], n[1], n[2]],
            tex_coord: [t[0], t[1]],
        })
        .collect()
}

/// Flat normals for a non-indexed triangle list
///
/// Every vertex of a triangle gets that triangle's normalized face normal.
/// A trailing partial triangle and degenerate triangles get zero normals.
pub fn calculate_face_normals(positions: &[f32]) -> Vec<f32> {
    let mut normals = vec![0.0; positions.len()];

    for (triangle, out) in positions.chunks_exact(9).zip(normals.chunks_exact_mut(9)) {
        let v0 = [triangle[0], triangle[1], triangle[2]];
        let v1 = [triangle[3], triangle[4], triangle[5]];
        let v2 = [triangle[6], triangle[7], triangle[8]];

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

        let mut face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        let length = (face_normal[0].powi(2) + face_normal[1].powi(2) + face_normal[2].powi(2)).sqrt();
        if length > 0.0 {
            face_normal.iter_mut().for_each(|c| *c /= length);
        }

        for vertex in out.chunks_exact_mut(3) {
            vertex.copy_from_slice(&face_normal);
        }
    }

    normals
}
