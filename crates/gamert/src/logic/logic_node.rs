//! Logic node trait and binding

use thiserror::Error;

use crate::input::InputSource;
use crate::scene::{NodeCapabilities, NodeId, SceneGraph2d};

/// Logic errors
#[derive(Error, Debug)]
pub enum LogicError {
    /// No behavior registered under this name
    #[error("Unknown behavior '{0}'")]
    UnknownBehavior(String),

    /// A behavior is already registered under this name
    #[error("Behavior '{0}' is already registered")]
    DuplicateBehavior(String),

    /// Node cannot host the behavior
    #[error("Node {node:?} lacks capabilities {required:?} needed by '{behavior}'")]
    MissingCapability {
        /// Behavior being bound
        behavior: &'static str,
        /// Target node
        node: NodeId,
        /// Capabilities the behavior needs
        required: NodeCapabilities,
    },

    /// Node does not exist in the graph
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// Behavior configuration could not be applied
    #[error("Invalid configuration for '{behavior}': {reason}")]
    InvalidConfig {
        /// Behavior being configured
        behavior: &'static str,
        /// What was wrong
        reason: String,
    },
}

/// Result type for logic operations
pub type LogicResult<T> = Result<T, LogicError>;

/// Per-frame tick inputs
#[derive(Clone, Copy)]
pub struct TickParams<'a> {
    /// Seconds since the previous tick
    pub elapsed: f32,

    /// Input for this frame
    pub input: &'a dyn InputSource,
}

/// A named behavior driving one scene node
pub trait LogicNode {
    /// Registered behavior name
    fn name(&self) -> &'static str;

    /// Capabilities a node needs to host this behavior
    fn required_capabilities(&self) -> NodeCapabilities;

    /// Apply behavior parameters from a TOML table
    fn configure(&mut self, _config: &toml::Value) -> LogicResult<()> {
        Ok(())
    }

    /// Bind to `node`, checking it exists and has the required capabilities
    fn bind(&mut self, graph: &SceneGraph2d, node: NodeId) -> LogicResult<()>;

    /// Currently bound node
    fn bound_node(&self) -> Option<NodeId>;

    /// Advance one frame
    ///
    /// Does nothing when unbound or when the bound node no longer exists.
    fn on_tick(&mut self, params: &TickParams<'_>, graph: &mut SceneGraph2d);
}

/// Capability-checked reference to a bound scene node
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeBinding {
    target: Option<NodeId>,
}

impl NodeBinding {
    /// Bind to `node` if it exists and has `required`
    ///
    /// A failed bind keeps the previous target.
    pub fn bind(
        &mut self,
        behavior: &'static str,
        required: NodeCapabilities,
        graph: &SceneGraph2d,
        node: NodeId,
    ) -> LogicResult<()> {
        let capabilities = graph
            .node(node)
            .map_err(|_| LogicError::UnknownNode(node))?
            .capabilities();
        if !capabilities.contains(required) {
            return Err(LogicError::MissingCapability {
                behavior,
                node,
                required,
            });
        }
        self.target = Some(node);
        Ok(())
    }

    /// Bound node, if any
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Bound node if it still exists in `graph`
    pub fn live_target(&self, graph: &SceneGraph2d) -> Option<NodeId> {
        self.target.filter(|id| graph.contains(*id))
    }
}
