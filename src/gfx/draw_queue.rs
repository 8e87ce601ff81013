//! Per-frame queue of mesh draws
//!
//! Scene traversal runs before the render pass exists, so mesh drawers
//! record what they want drawn here and the render engine replays the
//! queue inside the pass.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::DrawMatrices;

/// Per-draw uniform block
///
/// MUST match the `Node` struct in `phong.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub mvp: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub is_light_source: u32,
    _padding: [u32; 3],
}
// 4 * 64 + 16 = 272 bytes

impl NodeUniform {
    pub fn new(matrices: &DrawMatrices, is_light_source: bool) -> Self {
        Self {
            mvp: matrices.mvp.into(),
            model_view: matrices.model_view.into(),
            normal: matrices.normal.into(),
            model: matrices.model.into(),
            is_light_source: is_light_source as u32,
            _padding: [0; 3],
        }
    }
}

/// One recorded mesh draw
#[derive(Clone)]
pub struct DrawCommand {
    pub uniform: NodeUniform,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub texture_bind_group: wgpu::BindGroup,
}

/// Shared handle to the frame's draw list, in submission order
#[derive(Clone, Default)]
pub struct DrawQueue {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, command: DrawCommand) {
        self.commands.borrow_mut().push(command);
    }

    /// Removes and returns everything submitted so far
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}
