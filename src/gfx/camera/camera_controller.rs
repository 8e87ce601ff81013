//! Mouse and keyboard steering for the [`OrbitCamera`]
//!
//! Left-drag orbits, shift + left-drag pans the focus point, the wheel zooms
//! and shift + C returns to the starting view.

use log::debug;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;
use crate::config::CameraConfig;

const LEFT_MOUSE_BUTTON: u32 = 0;

/// What a mouse drag currently does to the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Idle,
    Orbit,
    Pan,
}

pub struct CameraController {
    config: CameraConfig,
    button_held: bool,
    shift_held: bool,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            button_held: false,
            shift_held: false,
        }
    }

    pub fn drag_mode(&self) -> DragMode {
        match (self.button_held, self.shift_held) {
            (false, _) => DragMode::Idle,
            (true, false) => DragMode::Orbit,
            (true, true) => DragMode::Pan,
        }
    }

    /// Applies a raw device event, returning whether the camera moved
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        match event {
            DeviceEvent::Button {
                button: LEFT_MOUSE_BUTTON,
                state,
            } => {
                self.button_held = state.is_pressed();
                false
            }
            DeviceEvent::MouseWheel { delta } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
                };
                camera.add_distance(-lines * self.config.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                let (dx, dy) = (*dx as f32, *dy as f32);
                match self.drag_mode() {
                    DragMode::Idle => return false,
                    DragMode::Orbit => {
                        camera.add_yaw(-dx * self.config.orbit_speed);
                        camera.add_pitch(dy * self.config.orbit_speed);
                    }
                    DragMode::Pan => {
                        camera.pan((-dx * self.config.pan_speed, dy * self.config.pan_speed));
                    }
                }
                true
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.process_key(code, event.state, camera);
        }
    }

    fn process_key(&mut self, code: KeyCode, state: ElementState, camera: &mut OrbitCamera) {
        match code {
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.shift_held = state.is_pressed();
            }
            KeyCode::KeyC if state.is_pressed() && self.shift_held => {
                debug!("Resetting camera to its starting view");
                camera.reset_to_default();
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (CameraController, OrbitCamera) {
        let config = CameraConfig::default();
        (CameraController::new(config), OrbitCamera::from_config(&config, 1.5))
    }

    fn press(button_state: ElementState) -> DeviceEvent {
        DeviceEvent::Button {
            button: LEFT_MOUSE_BUTTON,
            state: button_state,
        }
    }

    #[test]
    fn test_drag_mode_follows_shift() {
        let (mut controller, mut camera) = setup();
        assert_eq!(controller.drag_mode(), DragMode::Idle);

        controller.process_events(&press(ElementState::Pressed), &mut camera);
        assert_eq!(controller.drag_mode(), DragMode::Orbit);

        controller.process_key(KeyCode::ShiftLeft, ElementState::Pressed, &mut camera);
        assert_eq!(controller.drag_mode(), DragMode::Pan);

        controller.process_events(&press(ElementState::Released), &mut camera);
        assert_eq!(controller.drag_mode(), DragMode::Idle);
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let (mut controller, mut camera) = setup();
        let before = camera.eye;
        let moved = controller.process_events(&DeviceEvent::MouseMotion { delta: (40.0, 10.0) }, &mut camera);
        assert!(!moved);
        assert_eq!(camera.eye, before);
    }

    #[test]
    fn test_orbit_uses_configured_speed() {
        let (mut controller, mut camera) = setup();
        let speed = CameraConfig::default().orbit_speed;
        let (yaw, pitch) = (camera.yaw, camera.pitch);

        controller.process_events(&press(ElementState::Pressed), &mut camera);
        controller.process_events(&DeviceEvent::MouseMotion { delta: (20.0, -10.0) }, &mut camera);

        assert_relative_eq!(camera.yaw, yaw - 20.0 * speed, epsilon = 1e-6);
        assert_relative_eq!(camera.pitch, pitch - 10.0 * speed, epsilon = 1e-6);
    }

    #[test]
    fn test_wheel_zoom_stops_at_min_distance() {
        let (mut controller, mut camera) = setup();
        let scroll_in = DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        };

        controller.process_events(&scroll_in, &mut camera);
        assert!(camera.distance < CameraConfig::default().distance);

        for _ in 0..10_000 {
            controller.process_events(&scroll_in, &mut camera);
        }
        assert_relative_eq!(camera.distance, CameraConfig::default().min_distance);
    }

    #[test]
    fn test_shift_c_resets_view() {
        let (mut controller, mut camera) = setup();
        let start = camera.eye;
        camera.add_yaw(1.0);

        controller.process_key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert!((camera.eye - start).x.abs() > 1e-3);

        controller.process_key(KeyCode::ShiftRight, ElementState::Pressed, &mut camera);
        controller.process_key(KeyCode::KeyC, ElementState::Pressed, &mut camera);
        assert_relative_eq!(camera.eye, start, epsilon = 1e-5);
    }
}
