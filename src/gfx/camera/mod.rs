//! Orbit camera producing the root matrices of a scene traversal

pub mod camera_controller;
pub mod camera_utils;
pub mod orbit_camera;

pub use camera_controller::{CameraController, DragMode};
pub use camera_utils::{Camera, CameraManager};
pub use orbit_camera::OrbitCamera;
