//! Per-frame node behaviors
//!
//! A [`LogicNode`] is created by name from a [`LogicRegistry`], bound to one
//! scene node and ticked once per frame by the [`LogicManager`].

mod logic_node;
mod registry;
mod move_node;
mod manager;

pub use logic_node::{LogicError, LogicNode, LogicResult, NodeBinding, TickParams};
pub use registry::{LogicFactory, LogicRegistry};
pub use move_node::{MoveConfig, Node2dMove};
pub use manager::LogicManager;
