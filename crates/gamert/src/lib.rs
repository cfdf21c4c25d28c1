//! # gamert
//!
//! A small 2D rendering core on top of Vulkan.
//!
//! ## Features
//!
//! - **Resource Table**: builtin render passes and pipelines with owned handles
//! - **Scene Graph**: arena-backed 2D node tree with cached world transforms
//! - **Logic Nodes**: named per-frame behaviors bound to scene nodes
//! - **Render Manager**: records the active visual tree into command buffers
//!
//! Window, surface, swapchain and submission belong to the application; the
//! core only records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use gamert::prelude::*;
//!
//! fn setup(device: Rc<dyn GpuDevice>) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RendererConfig::default();
//!     let mut renderer = RenderManager::from_config(&config);
//!     renderer.set_device(device.clone());
//!     renderer.set_swapchain_format(vk::Format::B8G8R8A8_SRGB);
//!     renderer.set_swapchain_extent(vk::Extent2D { width: 1280, height: 720 });
//!     renderer.create_renderpasses()?;
//!     renderer.create_pipelines()?;
//!
//!     let scene = Rc::new(RefCell::new(SceneGraph2d::new()));
//!     scene.borrow_mut().init(&device)?;
//!     let quad = scene.borrow_mut().create_node("quad", Quad2d::default());
//!     scene.borrow_mut().switch_root_node(Some(quad))?;
//!     renderer.switch_vtree(scene);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod input;
pub mod render;
pub mod scene;
pub mod logic;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use ash::vk;

    pub use crate::{
        foundation::math::{Transform2D, Vec2},
        config::{Config, ConfigError, PipelineShaders, RendererConfig},
        assets::{FsResourceLoader, ResourceLoader},
        input::{GamepadAxes, InputSnapshot, InputSource},
        render::{
            BuiltinPipeline, BuiltinRenderPass, EmptyTree, FrameContext, RenderManager,
            SharedVisualTree, VisualTree,
            vulkan::{AshDevice, GpuDevice, VulkanError, VulkanResult},
        },
        scene::{Group, NodeCapabilities, NodeContent, NodeId, Quad2d, SceneError, SceneGraph2d, Spatial2d},
        logic::{LogicError, LogicManager, LogicNode, LogicRegistry, Node2dMove, TickParams},
    };
}
