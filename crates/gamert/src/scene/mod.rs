//! Scene management
//!
//! A 2D scene graph with explicit ownership transfer between nodes.

mod scene_node;
mod scene_graph;

pub use scene_node::{
    DrawContext, Group, NodeCapabilities, NodeContent, NodeId, Quad2d, SceneError, SceneNode,
    SceneResult, Spatial2d,
};
pub use scene_graph::SceneGraph2d;
