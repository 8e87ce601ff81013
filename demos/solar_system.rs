//! # Solar System Example
//!
//! A sun, the earth with its moon, and mars, built as a transform hierarchy.
//! Each planet hangs under an empty "orbit" node whose rotation carries it
//! around the sun; the moon's orbit node hangs under the earth, so it follows
//! the earth while circling it.
//!
//! ## Usage:
//! ```bash
//! cargo run --example solar_system [config.toml]
//! ```
//!
//! Textures are read from `assets/{sun,earth,moon,mars}.jpg` when present;
//! missing files fall back to a flat color.

use std::rc::Rc;

use anyhow::Result;
use log::warn;
use trellis::prelude::*;

/// A node whose rotation about the Y axis advances every frame
struct Spinner {
    node: NodeId,
    degrees_per_second: f32,
    angle: f32,
}

struct SolarSystem {
    spinners: Vec<Spinner>,
}

impl SolarSystem {
    fn new() -> Self {
        Self {
            spinners: Vec::new(),
        }
    }

    fn spin(&mut self, node: NodeId, degrees_per_second: f32) {
        self.spinners.push(Spinner {
            node,
            degrees_per_second,
            angle: 0.0,
        });
    }
}

fn load_texture(engine: &RenderEngine, name: &str, fallback: [u8; 4]) -> TextureImage {
    let path = format!("assets/{}.jpg", name);
    let max_dimension = engine.device().limits().max_texture_dimension_2d;
    let loaded = TextureImage::load(&path).and_then(|image| {
        image.check_limits(max_dimension)?;
        Ok(image)
    });
    loaded.unwrap_or_else(|e| {
        warn!("Using flat color for {}: {}", name, e);
        TextureImage::solid(fallback)
    })
}

fn body(
    engine: &RenderEngine,
    sphere: &MeshData,
    texture: &TextureImage,
    is_light_source: bool,
) -> Result<Rc<dyn Renderable>> {
    let mut drawer = engine.create_mesh_drawer(is_light_source);
    drawer.set_mesh(&sphere.positions, &sphere.tex_coords, &sphere.normals)?;
    drawer.set_texture(texture)?;
    Ok(Rc::new(drawer))
}

fn orbit_radius(radius: f32) -> Transform {
    Transform::from_translation(Vector3::new(radius, 0.0, 0.0))
}

impl SceneApp for SolarSystem {
    fn setup(&mut self, engine: &RenderEngine, scene: &mut SceneGraph) -> Result<Vec<NodeId>> {
        let sphere = generate_sphere(48, 24).to_mesh_data();

        let system = scene.add_root(None, Transform::identity())?;

        let sun = scene.add_node(
            Some(body(engine, &sphere, &load_texture(engine, "sun", [255, 200, 64, 255]), true)?),
            Transform::from_scale(2.0),
            Some(system),
        )?;
        self.spin(sun, 5.0);

        let earth_orbit = scene.add_node(None, Transform::identity(), Some(system))?;
        self.spin(earth_orbit, 20.0);
        let earth = scene.add_node(
            Some(body(engine, &sphere, &load_texture(engine, "earth", [64, 120, 220, 255]), false)?),
            orbit_radius(7.0).with_scale(0.6),
            Some(earth_orbit),
        )?;
        self.spin(earth, 90.0);

        let moon_orbit = scene.add_node(None, Transform::identity(), Some(earth))?;
        self.spin(moon_orbit, 60.0);
        scene.add_node(
            Some(body(engine, &sphere, &load_texture(engine, "moon", [180, 180, 180, 255]), false)?),
            orbit_radius(2.5).with_scale(0.4),
            Some(moon_orbit),
        )?;

        let mars_orbit = scene.add_node(None, Transform::identity(), Some(system))?;
        self.spin(mars_orbit, 11.0);
        let mars = SceneNode::builder()
            .renderable(body(engine, &sphere, &load_texture(engine, "mars", [200, 90, 50, 255]), false)?)
            .transform(orbit_radius(11.0).with_scale(0.45))
            .parent(mars_orbit)
            .build(scene)?;
        self.spin(mars, 80.0);

        Ok(vec![system])
    }

    fn update(&mut self, scene: &mut SceneGraph, dt: f32) {
        for spinner in &mut self.spinners {
            spinner.angle = (spinner.angle + spinner.degrees_per_second * dt) % 360.0;
            if let Ok(transform) = scene.transform_mut(spinner.node) {
                transform.rotation = Rotation::AxisAngle {
                    axis: Vector3::unit_y(),
                    angle: Deg(spinner.angle).into(),
                };
            }
        }
    }
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig {
            title: "Solar System".to_string(),
            ..AppConfig::default()
        },
    };

    TrellisApp::new(config)?.run(SolarSystem::new())
}
