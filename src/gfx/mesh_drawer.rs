//! Textured, Phong-lit mesh drawer
//!
//! [`MeshDrawer`] is the GPU implementation of [`Renderable`]. It owns its
//! vertex buffer and texture; drawing records a [`DrawCommand`] with the
//! node's composed matrices into the shared [`DrawQueue`].

use std::sync::Arc;

use log::{debug, trace};
use wgpu::util::DeviceExt;

use crate::gfx::{
    draw_queue::{DrawCommand, DrawQueue, NodeUniform},
    mesh::{self, MeshError},
    resources::texture_resource::TextureResource,
    texture::{TextureError, TextureImage},
};
use crate::scene::{DrawMatrices, Renderable};
use crate::wgpu_utils::binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc};

/// GPU handles every mesh drawer needs, handed out by the render engine
#[derive(Clone)]
pub struct DrawerContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub texture_layout: Arc<BindGroupLayoutWithDesc>,
    pub draw_queue: DrawQueue,
}

pub struct MeshDrawer {
    context: DrawerContext,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    texture: TextureResource,
    texture_bind_group: wgpu::BindGroup,
    is_light_source: bool,
}

impl MeshDrawer {
    /// Creates a drawer with no geometry and a plain white texture
    ///
    /// Light sources are drawn with their texture color only, skipping the
    /// lighting model.
    pub fn new(context: DrawerContext, is_light_source: bool) -> Self {
        let texture = TextureResource::create_from_image(
            &context.device,
            &context.queue,
            &TextureImage::solid([255, 255, 255, 255]),
            "Default Mesh Texture",
        );
        let texture_bind_group = create_texture_bind_group(&context, &texture);

        Self {
            context,
            vertex_buffer: None,
            vertex_count: 0,
            texture,
            texture_bind_group,
            is_light_source,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn is_light_source(&self) -> bool {
        self.is_light_source
    }

    pub fn set_light_source(&mut self, is_light_source: bool) {
        self.is_light_source = is_light_source;
    }

    pub fn texture(&self) -> &TextureResource {
        &self.texture
    }
}

impl Renderable for MeshDrawer {
    fn draw(&self, matrices: &DrawMatrices) {
        let Some(vertex_buffer) = &self.vertex_buffer else {
            trace!("Skipping draw of mesh drawer without geometry");
            return;
        };

        self.context.draw_queue.submit(DrawCommand {
            uniform: NodeUniform::new(matrices, self.is_light_source),
            vertex_buffer: vertex_buffer.clone(),
            vertex_count: self.vertex_count,
            texture_bind_group: self.texture_bind_group.clone(),
        });
    }

    fn set_mesh(
        &mut self,
        positions: &[f32],
        tex_coords: &[f32],
        normals: &[f32],
    ) -> Result<(), MeshError> {
        mesh::validate(positions, tex_coords, normals)?;
        let vertices = mesh::interleave(positions, tex_coords, normals);

        self.vertex_count = vertices.len() as u32;
        self.vertex_buffer = if vertices.is_empty() {
            None
        } else {
            Some(
                self.context
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Mesh Vertex Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
            )
        };

        debug!("Mesh drawer geometry set: {} vertices", self.vertex_count);
        Ok(())
    }

    fn set_texture(&mut self, image: &TextureImage) -> Result<(), TextureError> {
        image.check_limits(self.context.device.limits().max_texture_dimension_2d)?;
        self.texture = TextureResource::create_from_image(
            &self.context.device,
            &self.context.queue,
            image,
            "Mesh Texture",
        );
        self.texture_bind_group = create_texture_bind_group(&self.context, &self.texture);
        Ok(())
    }
}

fn create_texture_bind_group(context: &DrawerContext, texture: &TextureResource) -> wgpu::BindGroup {
    BindGroupBuilder::new(&context.texture_layout)
        .texture(&texture.view)
        .sampler(&texture.sampler)
        .create(&context.device, "Mesh Texture Bind Group")
}
