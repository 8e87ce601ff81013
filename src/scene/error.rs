use super::node::NodeId;

/// Structural and traversal errors of the scene graph
///
/// Everything except [`SceneError::RecursionLimitExceeded`] is raised while
/// the graph is being built, never during a draw.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching `child` under `parent` would make a node its own ancestor
    #[error("attaching {child} under {parent} would create a cycle")]
    InvalidHierarchy { parent: NodeId, child: NodeId },

    /// `child` already belongs to `parent`
    #[error("{child} is already a child of {parent}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    /// A node was built without a transform
    #[error("scene node has no transform")]
    MissingTransform,

    /// Recursive traversal went deeper than the configured limit
    #[error("scene traversal exceeded the depth limit of {limit}")]
    RecursionLimitExceeded { limit: usize },

    /// The id does not belong to this graph
    #[error("{0} does not exist in this scene graph")]
    UnknownNode(NodeId),
}
