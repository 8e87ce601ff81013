//! Traversal behaviour of the scene graph, observed through a recording renderable

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use cgmath::{Deg, Matrix4, Vector3};
use trellis::config::{NormalMatrixMode, SceneConfig, TraversalMode};
use trellis::gfx::{MeshError, TextureError, TextureImage};
use trellis::scene::{DrawMatrices, NodeId, Renderable, SceneError, SceneGraph, SceneNode, Transform};

type Log = Rc<RefCell<Vec<(&'static str, DrawMatrices)>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Renderable for Recorder {
    fn draw(&self, matrices: &DrawMatrices) {
        self.log.borrow_mut().push((self.name, *matrices));
    }

    fn set_mesh(&mut self, _: &[f32], _: &[f32], _: &[f32]) -> Result<(), MeshError> {
        Ok(())
    }

    fn set_texture(&mut self, _: &TextureImage) -> Result<(), TextureError> {
        Ok(())
    }
}

fn recorder(name: &'static str, log: &Log) -> Option<Rc<dyn Renderable>> {
    Some(Rc::new(Recorder {
        name,
        log: log.clone(),
    }))
}

fn names(log: &Log) -> Vec<&'static str> {
    log.borrow().iter().map(|(name, _)| *name).collect()
}

fn both_modes() -> [SceneConfig; 2] {
    [
        SceneConfig::default().with_traversal(TraversalMode::Recursive),
        SceneConfig::default().with_traversal(TraversalMode::Iterative),
    ]
}

#[test]
fn chain_composes_locals_in_order() {
    let a_local = Transform::from_translation(Vector3::new(1.0, 2.0, 3.0))
        .with_axis_angle(Vector3::unit_z(), Deg(30.0));
    let b_local = Transform::from_scale(1.5).with_axis_angle(Vector3::unit_x(), Deg(-45.0));
    let c_local = Transform::from_translation(Vector3::new(0.0, -4.0, 0.5))
        .with_scale_xyz(Vector3::new(1.0, 2.0, 3.0));
    let expected = a_local.to_matrix() * b_local.to_matrix() * c_local.to_matrix();

    for config in both_modes() {
        let log = Log::default();
        let mut scene = SceneGraph::with_config(config);
        let a = scene.add_root(None, a_local).unwrap();
        let b = scene.add_node(None, b_local, Some(a)).unwrap();
        scene.add_node(recorder("c", &log), c_local, Some(b)).unwrap();

        scene.draw(a, &DrawMatrices::identity()).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        let (_, received) = log[0];
        assert_relative_eq!(received.mvp, expected, epsilon = 1e-5);
        assert_relative_eq!(received.model_view, expected, epsilon = 1e-5);
        assert_relative_eq!(received.normal, expected, epsilon = 1e-5);
        assert_relative_eq!(received.model, expected, epsilon = 1e-5);
    }
}

#[test]
fn lone_empty_node_draws_nothing() {
    let log = Log::default();
    let mut scene = SceneGraph::new();
    let root = scene.add_root(None, Transform::identity()).unwrap();

    let stats = scene.draw(root, &DrawMatrices::identity()).unwrap();

    assert_eq!(stats.nodes_visited, 1);
    assert_eq!(stats.draw_calls, 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn each_renderable_child_draws_once() {
    const CHILDREN: usize = 7;

    for config in both_modes() {
        let log = Log::default();
        let mut scene = SceneGraph::with_config(config);
        let parent = scene.add_root(None, Transform::identity()).unwrap();
        for _ in 0..CHILDREN {
            scene
                .add_node(recorder("child", &log), Transform::identity(), Some(parent))
                .unwrap();
        }

        let stats = scene.draw(parent, &DrawMatrices::identity()).unwrap();

        assert_eq!(stats.draw_calls, CHILDREN);
        assert_eq!(log.borrow().len(), CHILDREN);
    }
}

#[test]
fn children_are_drawn_in_insertion_order() {
    for config in both_modes() {
        let log = Log::default();
        let mut scene = SceneGraph::with_config(config);
        let root = scene.add_root(recorder("root", &log), Transform::identity()).unwrap();

        // Y is created first but attached second
        let y = scene.add_root(recorder("y", &log), Transform::identity()).unwrap();
        let x = scene.add_root(recorder("x", &log), Transform::identity()).unwrap();
        let z = scene.add_root(recorder("z", &log), Transform::identity()).unwrap();
        scene.add_child(root, x).unwrap();
        scene.add_child(root, y).unwrap();
        scene.add_child(root, z).unwrap();
        scene
            .add_node(recorder("x.child", &log), Transform::identity(), Some(x))
            .unwrap();

        scene.draw(root, &DrawMatrices::identity()).unwrap();

        assert_eq!(names(&log), ["root", "x", "x.child", "y", "z"]);
        assert_eq!(scene.children(root).unwrap(), &[x, y, z]);
    }
}

#[test]
fn repeated_draws_record_identical_matrices() {
    let log = Log::default();
    let mut scene = SceneGraph::new();
    let root = scene
        .add_root(
            recorder("root", &log),
            Transform::from_translation(Vector3::new(0.0, 0.0, -10.0)),
        )
        .unwrap();
    let child = scene
        .add_node(
            recorder("child", &log),
            Transform::from_scale(0.5).with_axis_angle(Vector3::unit_y(), Deg(90.0)),
            Some(root),
        )
        .unwrap();
    scene
        .add_node(
            recorder("grandchild", &log),
            Transform::from_translation(Vector3::new(3.0, 0.0, 0.0)),
            Some(child),
        )
        .unwrap();

    let camera = DrawMatrices::from_camera(
        cgmath::perspective(Deg(45.0), 1.5, 0.1, 100.0),
        Matrix4::look_at_rh(
            cgmath::Point3::new(0.0, 2.0, 5.0),
            cgmath::Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        ),
    );

    scene.draw(root, &camera).unwrap();
    let first: Vec<_> = log.borrow_mut().drain(..).collect();
    scene.draw(root, &camera).unwrap();
    let second: Vec<_> = log.borrow_mut().drain(..).collect();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn closing_a_cycle_is_rejected() {
    let log = Log::default();
    let mut scene = SceneGraph::new();
    let a = scene.add_root(recorder("a", &log), Transform::identity()).unwrap();
    let b = scene
        .add_node(recorder("b", &log), Transform::identity(), Some(a))
        .unwrap();

    assert_eq!(
        scene.add_child(b, a),
        Err(SceneError::InvalidHierarchy {
            parent: b,
            child: a
        })
    );

    // The failed link left the graph untouched and drawable
    assert_eq!(scene.parent(a).unwrap(), None);
    assert!(scene.children(b).unwrap().is_empty());
    let stats = scene.draw(a, &DrawMatrices::identity()).unwrap();
    assert_eq!(stats.draw_calls, 2);
}

#[test]
fn translate_then_scale_scenario() {
    let log = Log::default();
    let mut scene = SceneGraph::new();
    let r = scene.add_root(None, Transform::identity()).unwrap();
    let n1 = scene
        .add_node(
            None,
            Transform::from_translation(Vector3::new(1.0, 0.0, 0.0)),
            Some(r),
        )
        .unwrap();
    scene
        .add_node(recorder("n2", &log), Transform::from_scale(2.0), Some(n1))
        .unwrap();

    scene.draw(r, &DrawMatrices::identity()).unwrap();

    let expected = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)) * Matrix4::from_scale(2.0);
    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_relative_eq!(log[0].1.mvp, expected, epsilon = 1e-6);

    // The origin lands at (1, 0, 0) and a unit offset is doubled
    let moved = log[0].1.mvp * Vector3::new(1.0, 0.0, 0.0).extend(1.0);
    assert_relative_eq!(moved.truncate(), Vector3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
}

#[test]
fn builder_requires_a_transform() {
    let mut scene = SceneGraph::new();
    assert_eq!(
        SceneNode::builder().build(&mut scene),
        Err(SceneError::MissingTransform)
    );
    assert!(scene.is_empty());

    let root = SceneNode::builder()
        .transform(Transform::identity())
        .build(&mut scene)
        .unwrap();
    let child = SceneNode::builder()
        .transform(Transform::from_scale(2.0))
        .parent(root)
        .build(&mut scene)
        .unwrap();
    assert_eq!(scene.parent(child).unwrap(), Some(root));
    assert_eq!(scene.roots().collect::<Vec<NodeId>>(), vec![root]);
}

#[test]
fn inverse_transpose_normals_undo_non_uniform_scale() {
    let log = Log::default();
    let config = SceneConfig::default().with_normal_matrix(NormalMatrixMode::InverseTranspose);
    let mut scene = SceneGraph::with_config(config);
    let root = scene
        .add_root(
            None,
            Transform::from_translation(Vector3::new(5.0, 0.0, 0.0)),
        )
        .unwrap();
    scene
        .add_node(
            recorder("squashed", &log),
            Transform::identity().with_scale_xyz(Vector3::new(1.0, 4.0, 1.0)),
            Some(root),
        )
        .unwrap();

    scene.draw(root, &DrawMatrices::identity()).unwrap();

    let received = log.borrow()[0].1;
    let model_view = received.model_view;
    let normal = received.normal;

    // A surface tangent transformed by model-view stays orthogonal to the
    // transformed normal of the 45 degree slope it lies on.
    let tangent = (model_view * Vector3::new(1.0, -1.0, 0.0).extend(0.0)).truncate();
    let n = (normal * Vector3::new(1.0, 1.0, 0.0).extend(0.0)).truncate();
    assert_relative_eq!(cgmath::dot(tangent, n), 0.0, epsilon = 1e-5);

    // The translation does not leak into the normal matrix
    assert_relative_eq!(normal.w.truncate(), Vector3::new(0.0, 0.0, 0.0));
    assert_relative_eq!(
        normal,
        Matrix4::from_nonuniform_scale(1.0, 0.25, 1.0),
        epsilon = 1e-6
    );
}

#[test]
fn deep_chain_needs_iterative_traversal() {
    const DEPTH: usize = 50;

    let log = Log::default();
    let mut scene = SceneGraph::with_config(SceneConfig::default().with_max_depth(DEPTH / 2));
    let root = scene.add_root(None, Transform::identity()).unwrap();
    let mut tip = root;
    for _ in 0..DEPTH {
        tip = scene
            .add_node(
                recorder("link", &log),
                Transform::from_translation(Vector3::new(0.0, 1.0, 0.0)),
                Some(tip),
            )
            .unwrap();
    }
    assert_eq!(scene.depth(tip).unwrap(), DEPTH);

    assert_eq!(
        scene.draw(root, &DrawMatrices::identity()),
        Err(SceneError::RecursionLimitExceeded { limit: DEPTH / 2 })
    );

    log.borrow_mut().clear();
    let mut config = *scene.config();
    config.traversal = TraversalMode::Iterative;
    scene.set_config(config);

    let stats = scene.draw(root, &DrawMatrices::identity()).unwrap();
    assert_eq!(stats.draw_calls, DEPTH);
    let last = log.borrow().last().map(|(_, m)| m.model).unwrap();
    assert_relative_eq!(last.w.truncate(), Vector3::new(0.0, DEPTH as f32, 0.0), epsilon = 1e-4);
}
