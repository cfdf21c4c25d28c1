//! Rendering core
//!
//! Builtin GPU resources, the per-frame recording context and the render
//! manager that drives the active visual tree.

pub mod vulkan;
pub mod resources;
mod frame;
mod render_manager;

#[cfg(test)]
pub(crate) mod testing;

pub use resources::{BuiltinPipeline, BuiltinRenderPass, ResourceTable, Transform2dPushConstants};
pub use frame::{FrameContext, PassRecorder};
pub use render_manager::{EmptyTree, RenderManager, SharedVisualTree, VisualTree};
