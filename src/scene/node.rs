//! Scene graph nodes and their builder

use std::fmt;
use std::rc::Rc;

use super::error::SceneError;
use super::graph::SceneGraph;
use super::renderable::Renderable;
use super::transform::Transform;

/// Handle to a node inside a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its graph's arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// A single node of the scene graph
///
/// Nodes live in the [`SceneGraph`] arena. The parent link is a plain id and
/// never owns anything; children are owned through the arena and kept in
/// insertion order, which is also the draw order.
pub struct SceneNode {
    pub(crate) renderable: Option<Rc<dyn Renderable>>,
    pub(crate) transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub(crate) fn new(renderable: Option<Rc<dyn Renderable>>, transform: Transform) -> Self {
        Self {
            renderable,
            transform,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Starts building a node
    pub fn builder() -> SceneNodeBuilder {
        SceneNodeBuilder::default()
    }

    pub fn renderable(&self) -> Option<&Rc<dyn Renderable>> {
        self.renderable.as_ref()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("has_renderable", &self.renderable.is_some())
            .field("transform", &self.transform)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}

/// Builder for adding a node to a [`SceneGraph`]
///
/// ```
/// use trellis::scene::{SceneGraph, SceneNode, Transform};
///
/// let mut graph = SceneGraph::new();
/// let root = SceneNode::builder()
///     .transform(Transform::identity())
///     .build(&mut graph)
///     .unwrap();
/// let child = SceneNode::builder()
///     .transform(Transform::from_scale(2.0))
///     .parent(root)
///     .build(&mut graph)
///     .unwrap();
/// assert_eq!(graph.children(root).unwrap(), &[child]);
/// ```
#[derive(Default)]
pub struct SceneNodeBuilder {
    renderable: Option<Rc<dyn Renderable>>,
    transform: Option<Transform>,
    parent: Option<NodeId>,
}

impl SceneNodeBuilder {
    pub fn renderable(mut self, renderable: Rc<dyn Renderable>) -> Self {
        self.renderable = Some(renderable);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adds the node to `graph`, attaching it to the parent if one was given
    pub fn build(self, graph: &mut SceneGraph) -> Result<NodeId, SceneError> {
        let transform = self.transform.ok_or(SceneError::MissingTransform)?;
        graph.add_node(self.renderable, transform, self.parent)
    }
}
