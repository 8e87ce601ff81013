//! WGPU-based rendering engine
//!
//! Owns the surface, device and queue, and turns one scene graph traversal
//! into one render pass: mesh drawers queue their draws while the graph is
//! walked, then the engine uploads every node's matrices into a dynamic
//! uniform buffer and replays the queue with the Phong pipeline.

use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;
use wgpu::TextureFormat;

use crate::config::{AppConfig, ShadingConfig};
use crate::gfx::{
    draw_queue::{DrawQueue, NodeUniform},
    mesh_drawer::{DrawerContext, MeshDrawer},
    resources::{shading_bindings::ShadingBindings, texture_resource::TextureResource},
};
use crate::scene::{DrawMatrices, DrawStats, NodeId, SceneError, SceneGraph};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::DynamicUniformBuffer,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const PHONG_PIPELINE: &str = "Phong";
const INITIAL_NODE_CAPACITY: usize = 64;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("scene traversal failed: {0}")]
    Scene(#[from] SceneError),
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("pipeline '{0}' is unavailable")]
    Pipeline(String),
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pub pipeline_manager: PipelineManager,

    shading: ShadingBindings,
    node_layout: BindGroupLayoutWithDesc,
    node_ubo: DynamicUniformBuffer<NodeUniform>,
    node_bind_group: wgpu::BindGroup,
    texture_layout: Arc<BindGroupLayoutWithDesc>,

    draw_queue: DrawQueue,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Sets up the depth buffer, the shading/node/texture bind group layouts
    /// and the Phong pipeline.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        app_config: &AppConfig,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(app_config.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let shading = ShadingBindings::new(&device, &app_config.shading);

        let node_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::dynamic_uniform(
                std::mem::size_of::<NodeUniform>() as u64,
            ))
            .create(&device, "Node Bind Group Layout");
        let node_ubo = DynamicUniformBuffer::new(&device, INITIAL_NODE_CAPACITY);
        let node_bind_group = create_node_bind_group(&device, &node_layout, &node_ubo);

        let texture_layout = Arc::new(
            BindGroupLayoutBuilder::new()
                .next_binding_fragment(binding_types::texture_2d())
                .next_binding_fragment(binding_types::sampler(
                    wgpu::SamplerBindingType::Filtering,
                ))
                .create(&device, "Texture Bind Group Layout"),
        );

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("phong", include_str!("phong.wgsl"));
        pipeline_manager.register_pipeline(
            PHONG_PIPELINE,
            PipelineConfig::default()
                .with_label("Phong Pipeline")
                .with_shader("phong")
                .with_bind_group_layouts(vec![
                    shading.bind_group_layout().clone(),
                    node_layout.layout.clone(),
                    texture_layout.layout.clone(),
                ])
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT),
        );
        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for e in errors {
                warn!("{}", e);
            }
        }

        let clear = app_config.clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color {
                r: clear[0],
                g: clear[1],
                b: clear[2],
                a: clear[3],
            },
            pipeline_manager,
            shading,
            node_layout,
            node_ubo,
            node_bind_group,
            texture_layout,
            draw_queue: DrawQueue::new(),
        })
    }

    /// Handles mesh drawers need to create buffers and queue draws
    pub fn drawer_context(&self) -> DrawerContext {
        DrawerContext {
            device: self.device.clone(),
            queue: self.queue.clone(),
            texture_layout: self.texture_layout.clone(),
            draw_queue: self.draw_queue.clone(),
        }
    }

    /// Creates an empty mesh drawer bound to this engine
    pub fn create_mesh_drawer(&self, is_light_source: bool) -> MeshDrawer {
        MeshDrawer::new(self.drawer_context(), is_light_source)
    }

    /// Draws every tree under `roots` with `matrices` as the root parent
    ///
    /// If any traversal fails nothing is presented and the partially filled
    /// draw queue is discarded.
    pub fn render(
        &mut self,
        scene: &SceneGraph,
        roots: &[NodeId],
        matrices: &DrawMatrices,
    ) -> Result<DrawStats, RenderError> {
        self.draw_queue.clear();

        let mut stats = DrawStats::default();
        for &root in roots {
            match scene.draw(root, matrices) {
                Ok(tree) => {
                    stats.nodes_visited += tree.nodes_visited;
                    stats.draw_calls += tree.draw_calls;
                }
                Err(e) => {
                    self.draw_queue.clear();
                    return Err(e.into());
                }
            }
        }

        let commands = self.draw_queue.take();
        let uniforms: Vec<NodeUniform> = commands.iter().map(|c| c.uniform).collect();
        if self.node_ubo.write(&self.device, &self.queue, &uniforms) {
            debug!(
                "Node uniform buffer grew to {} entries",
                self.node_ubo.capacity()
            );
            self.node_bind_group =
                create_node_bind_group(&self.device, &self.node_layout, &self.node_ubo);
        }

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let pipeline = self
                .pipeline_manager
                .get_pipeline(PHONG_PIPELINE)
                .ok_or_else(|| RenderError::Pipeline(PHONG_PIPELINE.to_string()))?;

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, self.shading.bind_group(), &[]);

            for (index, command) in commands.iter().enumerate() {
                render_pass.set_bind_group(1, &self.node_bind_group, &[self.node_ubo.offset(index)]);
                render_pass.set_bind_group(2, &command.texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, command.vertex_buffer.slice(..));
                render_pass.draw(0..command.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        Ok(stats)
    }

    /// Pushes new lighting parameters to the GPU
    pub fn set_shading(&mut self, shading: &ShadingConfig) {
        self.shading.update(&self.queue, shading);
    }

    /// Resizes the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Set VSync (vertical synchronization) state
    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn create_node_bind_group(
    device: &wgpu::Device,
    layout: &BindGroupLayoutWithDesc,
    ubo: &DynamicUniformBuffer<NodeUniform>,
) -> wgpu::BindGroup {
    BindGroupBuilder::new(layout)
        .resource(ubo.binding_resource())
        .create(device, "Node Bind Group")
}
