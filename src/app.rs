//! Window and frame loop
//!
//! [`TrellisApp`] owns the winit event loop. A [`SceneApp`] builds its scene
//! graph once the GPU is available and animates it every frame; the app
//! draws the returned roots through the orbit camera.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::AppConfig;
use crate::gfx::{
    camera::CameraManager,
    rendering::{RenderEngine, RenderError},
};
use crate::scene::{NodeId, SceneGraph};

/// User side of the application
pub trait SceneApp {
    /// Builds the scene and returns the roots drawn every frame
    fn setup(&mut self, engine: &RenderEngine, scene: &mut SceneGraph)
        -> anyhow::Result<Vec<NodeId>>;

    /// Advances the scene by `dt` seconds before it is drawn
    fn update(&mut self, _scene: &mut SceneGraph, _dt: f32) {}
}

pub struct TrellisApp {
    event_loop: EventLoop<()>,
    config: AppConfig,
}

struct AppState<A: SceneApp> {
    config: AppConfig,
    app: A,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera_manager: CameraManager,
    scene: SceneGraph,
    roots: Vec<NodeId>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl TrellisApp {
    /// Initializes logging and the event loop
    ///
    /// Logging defaults to `info` and honours `RUST_LOG`.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        Ok(Self { event_loop, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs until the window is closed or a frame fails
    pub fn run<A: SceneApp>(self, app: A) -> anyhow::Result<()> {
        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        let camera_manager = CameraManager::from_config(&self.config.camera, aspect);

        let mut state = AppState {
            scene: SceneGraph::with_config(self.config.scene),
            config: self.config,
            app,
            window: None,
            render_engine: None,
            camera_manager,
            roots: Vec::new(),
            last_frame: Instant::now(),
            error: None,
        };

        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut state)
            .context("event loop terminated abnormally")?;

        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// What the frame loop does after the surface refused a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceRecovery {
    Reconfigure,
    Skip,
    Fatal,
}

fn surface_recovery(error: &wgpu::SurfaceError) -> SurfaceRecovery {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceRecovery::Skip,
        _ => SurfaceRecovery::Fatal,
    }
}

impl<A: SceneApp> AppState<A> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{:#}", e);
        self.error = Some(e);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.as_str())
                    .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        self.camera_manager
            .camera
            .resize_projection(width, height);

        let config = &self.config;
        let engine = pollster::block_on(RenderEngine::new(window, width, height, config))?;
        info!("Render engine ready ({}x{})", width, height);

        self.roots = self
            .app
            .setup(&engine, &mut self.scene)
            .context("scene setup failed")?;
        info!(
            "Scene ready: {} nodes, {} roots",
            self.scene.len(),
            self.roots.len()
        );

        self.render_engine = Some(engine);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), RenderError> {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return Ok(());
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.app.update(&mut self.scene, dt);

        let matrices = self.camera_manager.draw_matrices();
        match render_engine.render(&self.scene, &self.roots, &matrices) {
            Ok(_) => Ok(()),
            Err(RenderError::Surface(e)) => match surface_recovery(&e) {
                SurfaceRecovery::Reconfigure => {
                    render_engine.reconfigure();
                    Ok(())
                }
                SurfaceRecovery::Skip => {
                    warn!("Skipping frame: {}", e);
                    Ok(())
                }
                SurfaceRecovery::Fatal => Err(RenderError::Surface(e)),
            },
            Err(e) => Err(e),
        }
    }
}

impl<A: SceneApp> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                }
                self.camera_manager.process_keyboard_event(&event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e.into());
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        self.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_recovery() {
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Lost), SurfaceRecovery::Reconfigure);
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Outdated), SurfaceRecovery::Reconfigure);
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Timeout), SurfaceRecovery::Skip);
        assert_eq!(surface_recovery(&wgpu::SurfaceError::Other), SurfaceRecovery::Skip);
        assert_eq!(surface_recovery(&wgpu::SurfaceError::OutOfMemory), SurfaceRecovery::Fatal);
    }
}
