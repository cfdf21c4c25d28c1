//! Scene nodes and their content
//!
//! A node is an arena entry carrying a local transform, a cached world
//! transform and a boxed [`NodeContent`] that decides what the node can do.

use bitflags::bitflags;
use thiserror::Error;

use crate::foundation::math::Transform2D;
use crate::render::vulkan::{VertexBuffer, VulkanError, VulkanResult};
use crate::render::{BuiltinPipeline, PassRecorder};

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph2d`](super::SceneGraph2d)
    pub struct NodeId;
}

bitflags! {
    /// What a node's content supports
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeCapabilities: u32 {
        /// Local transform can be changed
        const TRANSFORM_2D = 1 << 0;
        /// Records draws during the render traversal
        const RENDERABLE = 1 << 1;
    }
}

/// Scene graph errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Node does not exist in the graph
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// Node lacks a capability the operation needs
    #[error("Scene node {node:?} lacks capabilities {required:?}")]
    MissingCapability {
        /// Node
        node: NodeId,
        /// Capabilities the operation needs
        required: NodeCapabilities,
    },

    /// Operation would break the tree structure
    #[error("Invalid hierarchy: {reason}")]
    InvalidHierarchy {
        /// What was wrong
        reason: String,
    },
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Draw access handed to renderable content during the traversal
pub struct DrawContext<'r, 'p> {
    pub(crate) pass: &'r mut PassRecorder<'p>,
    pub(crate) unit_quad: Option<&'r VertexBuffer>,
}

impl<'p> DrawContext<'_, 'p> {
    /// Draw the graph's shared unit quad
    pub fn draw_unit_quad(&mut self, pipeline: BuiltinPipeline, world: &Transform2D) -> VulkanResult<()> {
        let quad = self
            .unit_quad
            .ok_or_else(|| VulkanError::invalid("Scene graph was rendered before init"))?;
        self.pass.draw_transformed(pipeline, quad, world)
    }

    /// Underlying pass recorder, for content with its own vertex data
    pub fn pass(&mut self) -> &mut PassRecorder<'p> {
        &mut *self.pass
    }
}

/// Behavior attached to a scene node
pub trait NodeContent {
    /// Capabilities this content provides
    fn capabilities(&self) -> NodeCapabilities;

    /// Called when the node's subtree becomes the active root
    fn on_init(&mut self) {}

    /// Called when the node's subtree stops being the active root
    fn on_uninit(&mut self) {}

    /// Record draws at world transform `world`
    ///
    /// Only called on content with [`NodeCapabilities::RENDERABLE`].
    fn record(&self, _world: &Transform2D, _draw: &mut DrawContext<'_, '_>) -> VulkanResult<()> {
        Ok(())
    }
}

/// Pure grouping node; its local transform stays identity
#[derive(Debug, Clone, Copy, Default)]
pub struct Group;

impl NodeContent for Group {
    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::empty()
    }
}

/// Positioned node that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Spatial2d;

impl NodeContent for Spatial2d {
    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::TRANSFORM_2D
    }
}

/// Axis-aligned unit quad, sized and placed by its world transform
#[derive(Debug, Clone, Copy)]
pub struct Quad2d {
    /// Pipeline the quad is drawn with
    pub pipeline: BuiltinPipeline,
}

impl Default for Quad2d {
    fn default() -> Self {
        Self {
            pipeline: BuiltinPipeline::Pos2dRgbColor,
        }
    }
}

impl NodeContent for Quad2d {
    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::TRANSFORM_2D | NodeCapabilities::RENDERABLE
    }

    fn record(&self, world: &Transform2D, draw: &mut DrawContext<'_, '_>) -> VulkanResult<()> {
        draw.draw_unit_quad(self.pipeline, world)
    }
}

/// One entry of the scene arena
pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) local: Transform2D,
    pub(crate) world: Transform2D,
    pub(crate) dirty: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) content: Box<dyn NodeContent>,
}

impl SceneNode {
    pub(crate) fn new(name: String, content: Box<dyn NodeContent>) -> Self {
        Self {
            name,
            local: Transform2D::identity(),
            world: Transform2D::identity(),
            dirty: false,
            parent: None,
            children: Vec::new(),
            content,
        }
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent
    pub fn local(&self) -> &Transform2D {
        &self.local
    }

    /// Cached transform relative to the root
    ///
    /// Stale while [`is_dirty`](Self::is_dirty) is set.
    pub fn world(&self) -> &Transform2D {
        &self.world
    }

    /// Whether the cached world transform awaits recomputation
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Owning parent
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Owned children in draw order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Capabilities of the node's content
    pub fn capabilities(&self) -> NodeCapabilities {
        self.content.capabilities()
    }

    /// Node content
    pub fn content(&self) -> &dyn NodeContent {
        self.content.as_ref()
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("local", &self.local)
            .field("world", &self.world)
            .field("dirty", &self.dirty)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_capabilities() {
        assert!(Group.capabilities().is_empty());
        assert_eq!(Spatial2d.capabilities(), NodeCapabilities::TRANSFORM_2D);

        let quad = Quad2d::default().capabilities();
        assert!(quad.contains(NodeCapabilities::TRANSFORM_2D | NodeCapabilities::RENDERABLE));
    }

    #[test]
    fn test_new_node_is_identity_and_detached() {
        let node = SceneNode::new("n".to_string(), Box::new(Spatial2d));

        assert_eq!(node.name(), "n");
        assert_eq!(*node.local(), Transform2D::identity());
        assert_eq!(*node.world(), Transform2D::identity());
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(!node.is_dirty());
    }
}
