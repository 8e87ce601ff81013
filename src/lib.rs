//! Trellis
//!
//! A hierarchical scene graph whose nodes carry parent-relative transforms,
//! drawn as textured, Phong-lit meshes with wgpu and winit.
//!
//! The [`scene`] module is independent of the GPU and can be driven by any
//! [`Renderable`](scene::Renderable); [`gfx`] supplies the wgpu
//! implementation and [`app`] the window and frame loop.

pub mod app;
pub mod config;
pub mod gfx;
pub mod prelude;
pub mod scene;
pub mod wgpu_utils;

pub use app::{SceneApp, TrellisApp};
pub use config::AppConfig;
