//! Per-frame shading uniforms
//!
//! Holds the fixed Phong lighting parameters shared by every mesh drawer.
//! Bound to slot 0 of the Phong pipeline.

use crate::{
    config::ShadingConfig,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Shading uniform block
///
/// MUST match the `Shading` struct in `phong.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadingUniform {
    light_position: [f32; 3],
    ambient: f32,
    view_reference: [f32; 3],
    diffuse: f32,
    specular: f32,
    shininess: f32,
    _padding: [f32; 2],
}
// 12 + 4 + 12 + 4 + 4 + 4 + 8 = 48 bytes

impl From<&ShadingConfig> for ShadingUniform {
    fn from(config: &ShadingConfig) -> Self {
        Self {
            light_position: config.light_position,
            ambient: config.ambient,
            view_reference: config.view_reference,
            diffuse: config.diffuse,
            specular: config.specular,
            shininess: config.shininess,
            _padding: [0.0; 2],
        }
    }
}

pub type ShadingUBO = UniformBuffer<ShadingUniform>;

/// Layout, buffer and bind group for the shading uniforms
pub struct ShadingBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
    ubo: ShadingUBO,
}

impl ShadingBindings {
    pub fn new(device: &wgpu::Device, config: &ShadingConfig) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Shading Bind Group Layout");

        let ubo = ShadingUBO::new_with_data(device, &ShadingUniform::from(config));
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Shading Bind Group");

        Self {
            bind_group_layout,
            bind_group,
            ubo,
        }
    }

    /// Pushes changed shading parameters to the GPU
    pub fn update(&mut self, queue: &wgpu::Queue, config: &ShadingConfig) {
        self.ubo.update_content(queue, ShadingUniform::from(config));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ShadingUniform>(), 48);
    }

    #[test]
    fn test_from_config() {
        let uniform = ShadingUniform::from(&ShadingConfig::default());
        assert_eq!(uniform.light_position, [0.0, 0.0, 5.0]);
        assert_eq!(uniform.shininess, 8.0);
    }
}
