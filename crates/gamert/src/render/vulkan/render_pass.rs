//! Render pass management
//!
//! Handles render pass creation and release following RAII principles

use std::rc::Rc;

use ash::vk;

use super::device::{GpuDevice, RenderPassDesc};
use super::error::VulkanResult;

/// Render pass wrapper with RAII cleanup
///
/// Not `Clone`: exactly one wrapper owns each render pass.
pub struct RenderPass {
    device: Rc<dyn GpuDevice>,
    render_pass: vk::RenderPass,
}

impl RenderPass {
    /// Create a render pass from a description
    pub fn new(device: Rc<dyn GpuDevice>, desc: &RenderPassDesc) -> VulkanResult<Self> {
        let render_pass = device.create_render_pass(desc)?;
        Ok(Self { device, render_pass })
    }

    /// Get the render pass handle
    pub fn handle(&self) -> vk::RenderPass {
        self.render_pass
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        self.device.destroy_render_pass(self.render_pass);
    }
}
