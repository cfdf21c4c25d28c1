//! 2D scene graph
//!
//! Nodes live in a slotmap arena and are addressed by [`NodeId`]. Ownership is
//! structural: a parent owns its children, the graph owns the active root, and
//! any node with no parent that is not the root belongs to whoever created or
//! detached it. Transferring ownership is reparenting an index.
//!
//! World transforms are cached. Eager setters keep the edited node exact and
//! flag its children; fast setters only flag the node. The render traversal
//! recomputes every flagged node (and everything below it) before drawing.

use std::rc::Rc;

use slotmap::SlotMap;

use crate::foundation::math::{Transform2D, Vec2};
use crate::render::vulkan::vertex_layout::UNIT_QUAD;
use crate::render::vulkan::{GpuDevice, VertexBuffer, VulkanResult};
use crate::render::{BuiltinRenderPass, FrameContext, VisualTree};

use super::scene_node::{DrawContext, NodeCapabilities, NodeContent, NodeId, SceneError, SceneNode, SceneResult};

/// Arena-backed tree of 2D nodes with one active root
#[derive(Default)]
pub struct SceneGraph2d {
    nodes: SlotMap<NodeId, SceneNode>,
    root: Option<NodeId>,
    unit_quad: Option<VertexBuffer>,
}

impl SceneGraph2d {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the graph's GPU resources
    pub fn init(&mut self, device: &Rc<dyn GpuDevice>) -> VulkanResult<()> {
        self.unit_quad = Some(VertexBuffer::new(device.clone(), &UNIT_QUAD)?);
        log::debug!("Scene graph initialized");
        Ok(())
    }

    /// Release the graph's GPU resources
    pub fn uninit(&mut self) {
        if self.unit_quad.take().is_some() {
            log::debug!("Scene graph uninitialized");
        }
    }

    /// Whether [`init`](Self::init) has run without a matching `uninit`
    pub fn is_initialized(&self) -> bool {
        self.unit_quad.is_some()
    }

    /// Create a detached node owned by the caller
    pub fn create_node(&mut self, name: impl Into<String>, content: impl NodeContent + 'static) -> NodeId {
        self.nodes.insert(SceneNode::new(name.into(), Box::new(content)))
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Active root
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> SceneResult<&SceneNode> {
        self.nodes.get(id).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut SceneNode> {
        self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Cached world transform of `id`
    pub fn world_transform(&self, id: NodeId) -> SceneResult<Transform2D> {
        self.node(id).map(|node| node.world)
    }

    /// Make `child` an owned child of `parent`
    ///
    /// `child` is taken from its previous parent if it had one. The child's
    /// subtree gets fresh world transforms.
    pub fn manage_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.node(parent)?;
        self.node(child)?;

        if parent == child {
            return Err(invalid_hierarchy("a node cannot be its own child"));
        }
        if self.root == Some(child) {
            return Err(invalid_hierarchy("the active root cannot become a child"));
        }
        if self.is_ancestor(child, parent) {
            return Err(invalid_hierarchy("reparenting would create a cycle"));
        }

        self.unlink_from_parent(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.recompute_subtree(child);
        Ok(())
    }

    /// Take `id` away from its parent and hand it back to the caller
    pub fn detach(&mut self, id: NodeId) -> SceneResult<()> {
        self.node(id)?;
        if self.root == Some(id) {
            return Err(invalid_hierarchy("use switch_root_node to remove the active root"));
        }
        self.unlink_from_parent(id);
        self.recompute_subtree(id);
        Ok(())
    }

    /// Destroy `id` and everything it owns
    ///
    /// Destroying the active root empties the graph.
    pub fn destroy_node(&mut self, id: NodeId) -> SceneResult<()> {
        self.node(id)?;
        if self.root == Some(id) {
            self.switch_root_node(None)?;
        }
        self.unlink_from_parent(id);

        let subtree = self.subtree(id);
        for node in &subtree {
            self.nodes.remove(*node);
        }
        log::debug!("Destroyed {} scene nodes", subtree.len());
        Ok(())
    }

    /// Replace the active root and return the previous one
    ///
    /// The previous root's subtree is uninitialized before the new root's
    /// subtree is initialized. The returned node is detached and owned by the
    /// caller. `new_root` must not have a parent.
    pub fn switch_root_node(&mut self, new_root: Option<NodeId>) -> SceneResult<Option<NodeId>> {
        if let Some(id) = new_root {
            if self.node(id)?.parent.is_some() {
                return Err(invalid_hierarchy("the new root must be detached"));
            }
        }

        let old_root = self.root.take();
        if let Some(old) = old_root {
            for id in self.subtree(old) {
                self.nodes[id].content.on_uninit();
            }
        }

        self.root = new_root;
        if let Some(new) = new_root {
            for id in self.subtree(new) {
                self.nodes[id].content.on_init();
            }
            self.recompute_subtree(new);
        }

        log::debug!("Switched scene root {old_root:?} -> {new_root:?}");
        Ok(old_root)
    }

    /// Set position and recompute the node's world transform
    ///
    /// Children are flagged for recomputation on the next render.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) -> SceneResult<()> {
        self.edit_local(id, |local| local.position = position)?;
        self.refresh_node(id);
        Ok(())
    }

    /// Set scale and recompute the node's world transform
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) -> SceneResult<()> {
        self.edit_local(id, |local| local.scale = scale)?;
        self.refresh_node(id);
        Ok(())
    }

    /// Set position, deferring the world transform to the next
    /// [`calculate_world`](Self::calculate_world) or render
    pub fn set_position_fast(&mut self, id: NodeId, position: Vec2) -> SceneResult<()> {
        self.edit_local(id, |local| local.position = position)?;
        self.nodes[id].dirty = true;
        Ok(())
    }

    /// Set scale, deferring the world transform
    pub fn set_scale_fast(&mut self, id: NodeId, scale: Vec2) -> SceneResult<()> {
        self.edit_local(id, |local| local.scale = scale)?;
        self.nodes[id].dirty = true;
        Ok(())
    }

    /// Recompute world transforms of `id`'s subtree, top-down
    pub fn calculate_world(&mut self, id: NodeId) -> SceneResult<()> {
        self.node(id)?;
        self.recompute_subtree(id);
        Ok(())
    }

    /// Node ids of `id`'s subtree in depth-first pre-order
    ///
    /// Empty if `id` does not exist.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current].children.iter().rev().copied());
        }
        out
    }

    fn edit_local(&mut self, id: NodeId, edit: impl FnOnce(&mut Transform2D)) -> SceneResult<()> {
        let node = self.node_mut(id)?;
        if !node.capabilities().contains(NodeCapabilities::TRANSFORM_2D) {
            return Err(SceneError::MissingCapability {
                node: id,
                required: NodeCapabilities::TRANSFORM_2D,
            });
        }
        edit(&mut node.local);
        Ok(())
    }

    fn parent_world(&self, id: NodeId) -> Transform2D {
        self.nodes[id]
            .parent
            .map_or_else(Transform2D::identity, |parent| self.nodes[parent].world)
    }

    fn refresh_node(&mut self, id: NodeId) {
        let parent_world = self.parent_world(id);
        let node = &mut self.nodes[id];
        node.world = parent_world.compose(&node.local);
        node.dirty = false;

        let children = node.children.clone();
        for child in children {
            self.nodes[child].dirty = true;
        }
    }

    fn recompute_subtree(&mut self, id: NodeId) {
        let mut stack = vec![(id, self.parent_world(id))];
        while let Some((current, parent_world)) = stack.pop() {
            let node = &mut self.nodes[current];
            node.world = parent_world.compose(&node.local);
            node.dirty = false;

            let world = node.world;
            stack.extend(node.children.iter().rev().map(|child| (*child, world)));
        }
    }

    fn unlink_from_parent(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|child| *child != id);
            }
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }
}

fn invalid_hierarchy(reason: &str) -> SceneError {
    SceneError::InvalidHierarchy {
        reason: reason.to_string(),
    }
}

impl VisualTree for SceneGraph2d {
    fn render(&mut self, frame: &mut FrameContext<'_>) -> VulkanResult<()> {
        let Some(root) = self.root else {
            return Ok(());
        };

        let mut pass = frame.begin_pass(BuiltinRenderPass::Default)?;
        let mut draw = DrawContext {
            pass: &mut pass,
            unit_quad: self.unit_quad.as_ref(),
        };

        // (node, parent world, parent was recomputed this frame)
        let mut stack = vec![(root, Transform2D::identity(), false)];
        while let Some((id, parent_world, parent_changed)) = stack.pop() {
            let node = &mut self.nodes[id];
            let changed = parent_changed || node.dirty;
            if changed {
                node.world = parent_world.compose(&node.local);
                node.dirty = false;
            }

            if node.capabilities().contains(NodeCapabilities::RENDERABLE) {
                node.content.record(&node.world, &mut draw)?;
            }

            let world = node.world;
            stack.extend(node.children.iter().rev().map(|child| (*child, world, changed)));
        }

        pass.finish()?;
        Ok(())
    }
}
