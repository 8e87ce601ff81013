//! The drawing contract consumed by scene nodes

use crate::gfx::mesh::MeshError;
use crate::gfx::texture::{TextureError, TextureImage};

use super::matrices::DrawMatrices;

/// Something a scene node can draw with its composed matrices
///
/// Renderables are shared between nodes (`Rc<dyn Renderable>`), so `draw`
/// takes `&self`. Geometry and texture are replaced through `&mut self`
/// while the renderable is still uniquely owned.
pub trait Renderable {
    /// Issues the draw for one node
    fn draw(&self, matrices: &DrawMatrices);

    /// Replaces the stored geometry
    ///
    /// `positions` and `normals` hold three floats per vertex, `tex_coords`
    /// two. The vertex count is `positions.len() / 3`.
    fn set_mesh(
        &mut self,
        positions: &[f32],
        tex_coords: &[f32],
        normals: &[f32],
    ) -> Result<(), MeshError>;

    /// Replaces the bound texture image
    fn set_texture(&mut self, image: &TextureImage) -> Result<(), TextureError>;
}
