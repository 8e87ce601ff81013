use cgmath::Matrix4;
use winit::{
    event::{DeviceEvent, KeyEvent},
    window::Window,
};

use crate::config::CameraConfig;
use crate::scene::DrawMatrices;

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::new(OrbitCamera::from_config(config, aspect), CameraController::new(*config))
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        if self.controller.process_events(event, &mut self.camera) {
            window.request_redraw();
        }
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller
            .process_keyed_events(event, &mut self.camera);
    }

    /// Root matrices for a scene traversal seen through this camera
    pub fn draw_matrices(&self) -> DrawMatrices {
        DrawMatrices::from_camera(
            self.camera.build_projection_matrix(),
            self.camera.build_view_matrix(),
        )
    }

    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

pub trait Camera: Sized {
    fn build_projection_matrix(&self) -> Matrix4<f32>;

    fn build_view_matrix(&self) -> Matrix4<f32>;

    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.build_projection_matrix() * self.build_view_matrix()
    }
}
