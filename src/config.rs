//! Configuration for the scene graph, the shading model and the application
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```toml
//! title = "Solar System"
//!
//! [scene]
//! traversal = "iterative"
//! normal_matrix = "inverse_transpose"
//!
//! [shading]
//! light_position = [0.0, 0.0, 5.0]
//!
//! [camera]
//! distance = 30.0
//! orbit_speed = 0.01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How [`SceneGraph::draw`](crate::scene::SceneGraph::draw) walks the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalMode {
    /// Recursive pre-order walk, bounded by [`SceneConfig::max_depth`]
    #[default]
    Recursive,
    /// Explicit-stack pre-order walk, not bounded by the call stack
    Iterative,
}

/// How the normal matrix is derived for each node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMatrixMode {
    /// `parent_normal * local`, the same composition as the other matrices
    #[default]
    Composed,
    /// Inverse-transpose of the upper 3x3 of the composed model-view matrix
    InverseTranspose,
}

/// Scene traversal settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub traversal: TraversalMode,
    /// Deepest node (root = depth 0) the recursive traversal will enter
    pub max_depth: usize,
    pub normal_matrix: NormalMatrixMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            traversal: TraversalMode::Recursive,
            max_depth: 1024,
            normal_matrix: NormalMatrixMode::Composed,
        }
    }
}

impl SceneConfig {
    pub fn with_traversal(mut self, traversal: TraversalMode) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_normal_matrix(mut self, mode: NormalMatrixMode) -> Self {
        self.normal_matrix = mode;
        self
    }
}

/// Fixed Phong lighting parameters shared by every mesh drawer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Point light position in world space
    pub light_position: [f32; 3],
    /// Point the view direction is measured from
    pub view_reference: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light_position: [0.0, 0.0, 5.0],
            view_reference: [0.0, 0.0, -1.0],
            ambient: 0.35,
            diffuse: 0.7,
            specular: 0.5,
            shininess: 8.0,
        }
    }
}

/// Orbit camera placement and mouse sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting distance from the origin
    pub distance: f32,
    /// Starting elevation in radians
    pub pitch: f32,
    /// Closest the wheel can zoom in
    pub min_distance: f32,
    /// Radians of yaw or pitch per pixel of drag
    pub orbit_speed: f32,
    /// Distance change per wheel line, scaled by `log10(distance)`
    pub zoom_speed: f32,
    /// Shift-drag pan per pixel, scaled by distance
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 20.0,
            pitch: 0.5,
            min_distance: 1.1,
            orbit_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
        }
    }
}

/// Window and frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 4],
    pub vsync: bool,
    pub scene: SceneConfig,
    pub shading: ShadingConfig,
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Trellis".to_string(),
            width: 1200,
            height: 800,
            clear_color: [0.05, 0.05, 0.1, 1.0],
            vsync: true,
            scene: SceneConfig::default(),
            shading: ShadingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Serializes the config back to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
