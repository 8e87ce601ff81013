//! Arena-backed scene graph and its traversal

use std::rc::Rc;

use log::{debug, trace};

use crate::config::{SceneConfig, TraversalMode};

use super::error::SceneError;
use super::matrices::DrawMatrices;
use super::node::{NodeId, SceneNode};
use super::renderable::Renderable;
use super::transform::Transform;

/// Counters gathered during one [`SceneGraph::draw`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub nodes_visited: usize,
    pub draw_calls: usize,
}

/// Owner of every node in a scene
///
/// Nodes are appended and never removed, so a [`NodeId`] stays valid for the
/// life of the graph. Several independent trees may live in one graph; each
/// is drawn by calling [`draw`](Self::draw) on its root.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    config: SceneConfig,
}

impl SceneGraph {
    /// Creates an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Adds a node, appending it to `parent`'s children when a parent is given
    pub fn add_node(
        &mut self,
        renderable: Option<Rc<dyn Renderable>>,
        transform: Transform,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent {
            self.check(parent)?;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode::new(renderable, transform));

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
            self.nodes[id.0].parent = Some(parent);
        }

        debug!("Added {} (parent: {:?})", id, parent);
        Ok(id)
    }

    /// Shorthand for a root node
    pub fn add_root(
        &mut self,
        renderable: Option<Rc<dyn Renderable>>,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        self.add_node(renderable, transform, None)
    }

    /// Attaches an existing root node under `parent`
    ///
    /// Fails with [`SceneError::InvalidHierarchy`] if `child` is `parent` or
    /// one of its ancestors, and with [`SceneError::AlreadyParented`] if
    /// `child` already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check(parent)?;
        self.check(child)?;

        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::InvalidHierarchy { parent, child });
        }

        if let Some(existing) = self.nodes[child.0].parent {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        debug!("Attached {} under {}", child, parent);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(&self.node(id)?.children)
    }

    /// Iterates from the parent of `id` up to its root
    pub fn ancestors(&self, id: NodeId) -> Result<Ancestors<'_>, SceneError> {
        Ok(Ancestors {
            graph: self,
            next: self.node(id)?.parent,
        })
    }

    /// Whether `ancestor` lies on the path from `node` to its root
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node)
            .map(|mut path| path.any(|id| id == ancestor))
            .unwrap_or(false)
    }

    /// Number of edges between `id` and its root
    pub fn depth(&self, id: NodeId) -> Result<usize, SceneError> {
        Ok(self.ancestors(id)?.count())
    }

    /// Nodes without a parent, in creation order
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| NodeId(index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutable access to a node's local transform, for animation between frames
    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        self.nodes
            .get_mut(id.0)
            .map(|node| &mut node.transform)
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Replaces (or clears) a node's renderable
    pub fn set_renderable(
        &mut self,
        id: NodeId,
        renderable: Option<Rc<dyn Renderable>>,
    ) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))?;
        node.renderable = renderable;
        Ok(())
    }

    /// Draws the subtree rooted at `root`
    ///
    /// `parent` holds the matrices accumulated above `root` (the camera-level
    /// matrices for a true root). Each node composes its local transform onto
    /// them, draws its renderable if it has one, then draws its children in
    /// insertion order with the composed matrices.
    pub fn draw(&self, root: NodeId, parent: &DrawMatrices) -> Result<DrawStats, SceneError> {
        self.check(root)?;

        let mut stats = DrawStats::default();
        match self.config.traversal {
            TraversalMode::Recursive => self.draw_recursive(root, parent, 0, &mut stats)?,
            TraversalMode::Iterative => self.draw_iterative(root, parent, &mut stats),
        }

        trace!(
            "Drew subtree of {}: {} nodes, {} draw calls",
            root,
            stats.nodes_visited,
            stats.draw_calls
        );
        Ok(stats)
    }

    fn draw_recursive(
        &self,
        id: NodeId,
        parent: &DrawMatrices,
        depth: usize,
        stats: &mut DrawStats,
    ) -> Result<(), SceneError> {
        if depth > self.config.max_depth {
            return Err(SceneError::RecursionLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let node = &self.nodes[id.0];
        let updated = self.visit(node, parent, stats);

        for &child in &node.children {
            self.draw_recursive(child, &updated, depth + 1, stats)?;
        }
        Ok(())
    }

    fn draw_iterative(&self, root: NodeId, parent: &DrawMatrices, stats: &mut DrawStats) {
        let mut stack = vec![(root, *parent)];

        while let Some((id, parent)) = stack.pop() {
            let node = &self.nodes[id.0];
            let updated = self.visit(node, &parent, stats);

            // Reversed so the first child is popped first
            stack.extend(node.children.iter().rev().map(|&child| (child, updated)));
        }
    }

    /// Composes one node's matrices and issues its draw
    fn visit(&self, node: &SceneNode, parent: &DrawMatrices, stats: &mut DrawStats) -> DrawMatrices {
        let local = node.transform.to_matrix();
        let updated = parent.compose(&local, self.config.normal_matrix);

        if let Some(renderable) = &node.renderable {
            renderable.draw(&updated);
            stats.draw_calls += 1;
        }

        stats.nodes_visited += 1;
        updated
    }

    fn check(&self, id: NodeId) -> Result<(), SceneError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(id))
        }
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.nodes[current.0].parent;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::{DrawLog, RecordingRenderable};
    use cgmath::Vector3;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn leaf(graph: &mut SceneGraph, parent: Option<NodeId>) -> NodeId {
        graph.add_node(None, Transform::identity(), parent).unwrap()
    }

    #[test]
    fn test_add_node_unknown_parent() {
        let mut graph = SceneGraph::new();
        let err = graph
            .add_node(None, Transform::identity(), Some(NodeId(3)))
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownNode(NodeId(3)));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_self_parenting_is_invalid() {
        let mut graph = SceneGraph::new();
        let a = leaf(&mut graph, None);
        assert_eq!(
            graph.add_child(a, a),
            Err(SceneError::InvalidHierarchy { parent: a, child: a })
        );
        assert!(graph.children(a).unwrap().is_empty());
    }

    #[test]
    fn test_transitive_cycle_is_invalid() {
        let mut graph = SceneGraph::new();
        let a = leaf(&mut graph, None);
        let b = leaf(&mut graph, Some(a));
        let c = leaf(&mut graph, Some(b));

        assert_eq!(
            graph.add_child(c, a),
            Err(SceneError::InvalidHierarchy { parent: c, child: a })
        );
        assert_eq!(graph.parent(a).unwrap(), None);
    }

    #[test]
    fn test_second_parent_is_rejected() {
        let mut graph = SceneGraph::new();
        let a = leaf(&mut graph, None);
        let b = leaf(&mut graph, None);
        let c = leaf(&mut graph, Some(a));

        assert_eq!(
            graph.add_child(b, c),
            Err(SceneError::AlreadyParented { child: c, parent: a })
        );
        assert!(graph.children(b).unwrap().is_empty());
    }

    #[test]
    fn test_add_child_links_both_directions() {
        let mut graph = SceneGraph::new();
        let a = leaf(&mut graph, None);
        let b = leaf(&mut graph, None);

        graph.add_child(a, b).unwrap();
        assert_eq!(graph.children(a).unwrap(), &[b]);
        assert_eq!(graph.parent(b).unwrap(), Some(a));
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let mut graph = SceneGraph::new();
        let a = leaf(&mut graph, None);
        let b = leaf(&mut graph, Some(a));
        let c = leaf(&mut graph, Some(b));

        assert_eq!(graph.ancestors(c).unwrap().collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(graph.depth(a).unwrap(), 0);
        assert_eq!(graph.depth(c).unwrap(), 2);
        assert!(graph.is_ancestor(a, c));
        assert!(!graph.is_ancestor(c, a));
    }

    #[test]
    fn test_draw_unknown_root() {
        let graph = SceneGraph::new();
        assert_eq!(
            graph.draw(NodeId(0), &DrawMatrices::identity()),
            Err(SceneError::UnknownNode(NodeId(0)))
        );
    }

    #[test]
    fn test_recursion_limit() {
        let mut graph = SceneGraph::with_config(SceneConfig::default().with_max_depth(3));
        let root = leaf(&mut graph, None);
        let mut tip = root;
        for _ in 0..3 {
            tip = leaf(&mut graph, Some(tip));
        }

        // Depth 3 is still inside the limit
        let stats = graph.draw(root, &DrawMatrices::identity()).unwrap();
        assert_eq!(stats.nodes_visited, 4);

        leaf(&mut graph, Some(tip));
        assert_eq!(
            graph.draw(root, &DrawMatrices::identity()),
            Err(SceneError::RecursionLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn test_iterative_ignores_recursion_limit() {
        let config = SceneConfig::default()
            .with_max_depth(2)
            .with_traversal(TraversalMode::Iterative);
        let mut graph = SceneGraph::with_config(config);
        let root = leaf(&mut graph, None);
        let mut tip = root;
        for _ in 0..10_000 {
            tip = leaf(&mut graph, Some(tip));
        }

        let stats = graph.draw(root, &DrawMatrices::identity()).unwrap();
        assert_eq!(stats.nodes_visited, 10_001);
    }

    #[test]
    fn test_draw_subtree_only() {
        let log = DrawLog::default();
        let mut graph = SceneGraph::new();
        let root = graph
            .add_root(Some(RecordingRenderable::shared("root", &log)), Transform::identity())
            .unwrap();
        let branch = graph
            .add_node(
                Some(RecordingRenderable::shared("branch", &log)),
                Transform::from_translation(Vector3::new(0.0, 1.0, 0.0)),
                Some(root),
            )
            .unwrap();
        graph
            .add_node(
                Some(RecordingRenderable::shared("twig", &log)),
                Transform::identity(),
                Some(branch),
            )
            .unwrap();

        graph.draw(branch, &DrawMatrices::identity()).unwrap();
        assert_eq!(log.tags(), vec!["branch", "twig"]);
    }

    #[test]
    fn test_recursive_and_iterative_agree_on_random_trees() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let log = DrawLog::default();
            let mut graph = SceneGraph::new();
            let root = graph.add_root(None, Transform::identity()).unwrap();
            let mut ids = vec![root];

            for i in 0..rng.random_range(1..60) {
                let parent = ids[rng.random_range(0..ids.len())];
                let transform = Transform::from_translation(Vector3::new(
                    rng.random_range(-2.0..2.0),
                    rng.random_range(-2.0..2.0),
                    rng.random_range(-2.0..2.0),
                ))
                .with_axis_angle(Vector3::unit_y(), cgmath::Deg(rng.random_range(0.0..360.0)))
                .with_scale(rng.random_range(0.5..2.0));
                let renderable = if rng.random_bool(0.7) {
                    Some(RecordingRenderable::shared(&format!("n{i}"), &log))
                } else {
                    None
                };
                ids.push(graph.add_node(renderable, transform, Some(parent)).unwrap());
            }

            let camera = DrawMatrices::from_camera(
                cgmath::perspective(cgmath::Deg(45.0), 1.5, 0.1, 100.0),
                cgmath::Matrix4::from_translation(Vector3::new(0.0, 0.0, -10.0)),
            );

            let recursive = graph.draw(root, &camera).unwrap();
            let first = log.take();

            graph.set_config(SceneConfig::default().with_traversal(TraversalMode::Iterative));
            let iterative = graph.draw(root, &camera).unwrap();
            let second = log.take();

            assert_eq!(recursive, iterative);
            assert_eq!(first, second);
        }
    }
}
