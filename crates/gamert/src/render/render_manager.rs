//! Render manager
//!
//! Composition root of the rendering core. The device, swapchain and command
//! pool come from the platform layer through setters and are never created or
//! destroyed here. The manager owns the builtin resource table and the
//! per-frame command sequence, and renders whichever visual tree is active.

use std::cell::RefCell;
use std::rc::Rc;

use ash::vk;

use crate::assets::{FsResourceLoader, ResourceLoader};
use crate::config::RendererConfig;
use crate::render::frame::FrameContext;
use crate::render::resources::{BuiltinPipeline, BuiltinRenderPass, ResourceTable};
use crate::render::vulkan::{GpuDevice, VulkanError, VulkanResult};

/// Something the render manager can render each frame
pub trait VisualTree {
    /// Called when the tree becomes the active one
    fn on_init(&mut self) {}

    /// Called when the tree stops being the active one
    fn on_uninit(&mut self) {}

    /// Record this frame's commands
    fn render(&mut self, frame: &mut FrameContext<'_>) -> VulkanResult<()>;
}

/// Shared handle to a visual tree
///
/// The application keeps its own clone to mutate the scene between frames.
pub type SharedVisualTree = Rc<RefCell<dyn VisualTree>>;

/// Tree that renders nothing, installed until a real one is switched in
#[derive(Debug, Default)]
pub struct EmptyTree;

impl VisualTree for EmptyTree {
    fn render(&mut self, _frame: &mut FrameContext<'_>) -> VulkanResult<()> {
        Ok(())
    }
}

/// Owns builtin GPU resources and renders the active visual tree
pub struct RenderManager {
    device: Option<Rc<dyn GpuDevice>>,
    physical_device: vk::PhysicalDevice,
    swapchain_format: vk::Format,
    swapchain_extent: vk::Extent2D,
    command_pool: vk::CommandPool,
    loader: Box<dyn ResourceLoader>,
    resources: ResourceTable,
    commands: Vec<vk::CommandBuffer>,
    vtree: SharedVisualTree,
}

impl RenderManager {
    /// Create a manager that loads shaders through `loader`
    pub fn new(config: &RendererConfig, loader: Box<dyn ResourceLoader>) -> Self {
        Self {
            device: None,
            physical_device: vk::PhysicalDevice::null(),
            swapchain_format: vk::Format::UNDEFINED,
            swapchain_extent: vk::Extent2D::default(),
            command_pool: vk::CommandPool::null(),
            loader,
            resources: ResourceTable::from_config(config),
            commands: Vec::new(),
            vtree: Rc::new(RefCell::new(EmptyTree)),
        }
    }

    /// Create a manager that loads shaders from `config.shader_root`
    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config, Box::new(FsResourceLoader::new(&config.shader_root)))
    }

    /// Set the logical device
    ///
    /// Command buffers recorded on the previous device are freed first.
    pub fn set_device(&mut self, device: Rc<dyn GpuDevice>) {
        self.clear_commands();
        self.device = Some(device);
    }

    /// Set the physical device
    pub fn set_physical_device(&mut self, physical_device: vk::PhysicalDevice) {
        self.physical_device = physical_device;
    }

    /// Set the swapchain image format
    pub fn set_swapchain_format(&mut self, format: vk::Format) {
        self.swapchain_format = format;
    }

    /// Set the swapchain extent
    pub fn set_swapchain_extent(&mut self, extent: vk::Extent2D) {
        self.swapchain_extent = extent;
    }

    /// Set the command pool frames are recorded from
    ///
    /// Command buffers allocated from the previous pool are freed first.
    pub fn set_command_pool(&mut self, pool: vk::CommandPool) {
        self.clear_commands();
        self.command_pool = pool;
    }

    /// Logical device, if set
    pub fn device(&self) -> Option<&Rc<dyn GpuDevice>> {
        self.device.as_ref()
    }

    /// Physical device
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Swapchain image format
    pub fn swapchain_format(&self) -> vk::Format {
        self.swapchain_format
    }

    /// Swapchain extent
    pub fn swapchain_extent(&self) -> vk::Extent2D {
        self.swapchain_extent
    }

    /// Command pool
    pub fn command_pool(&self) -> vk::CommandPool {
        self.command_pool
    }

    /// Builtin resource table
    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    fn require_device(&self) -> VulkanResult<Rc<dyn GpuDevice>> {
        self.device
            .clone()
            .ok_or_else(|| VulkanError::invalid("No device has been set on the render manager"))
    }

    /// Create the builtin render passes for the current swapchain format
    pub fn create_renderpasses(&mut self) -> VulkanResult<()> {
        let device = self.require_device()?;
        if self.swapchain_format == vk::Format::UNDEFINED {
            return Err(VulkanError::invalid("Swapchain format must be set before creating render passes"));
        }
        self.resources.create_renderpasses(&device, self.swapchain_format)
    }

    /// Create the builtin pipelines for the current swapchain extent
    pub fn create_pipelines(&mut self) -> VulkanResult<()> {
        let device = self.require_device()?;
        self.resources
            .create_pipelines(&device, self.loader.as_ref(), self.swapchain_extent)
    }

    /// Release the builtin render passes
    ///
    /// The device must be idle.
    pub fn destroy_renderpasses(&mut self) {
        self.resources.destroy_renderpasses();
    }

    /// Release the builtin pipelines
    ///
    /// The device must be idle.
    pub fn destroy_pipelines(&mut self) {
        self.resources.destroy_pipelines();
    }

    /// Rebuild every pipeline for a new swapchain extent
    ///
    /// Viewport and scissor are baked into the pipelines, so a resize needs
    /// this. The device must be idle.
    pub fn recreate_pipelines(&mut self, extent: vk::Extent2D) -> VulkanResult<()> {
        log::debug!("Recreating pipelines for {}x{}", extent.width, extent.height);
        self.swapchain_extent = extent;
        self.destroy_pipelines();
        self.create_pipelines()
    }

    /// Pipeline handle, null when not created
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered in the resource table.
    pub fn pipeline(&self, id: BuiltinPipeline) -> vk::Pipeline {
        self.resources.pipeline(id)
    }

    /// Render pass handle, null when not created
    pub fn render_pass(&self, kind: BuiltinRenderPass) -> vk::RenderPass {
        self.resources.render_pass(kind)
    }

    /// Command buffers recorded since the last [`clear_commands`](Self::clear_commands)
    pub fn commands(&self) -> &[vk::CommandBuffer] {
        &self.commands
    }

    /// Free recorded command buffers back to the command pool
    ///
    /// Call once per frame before rendering, after the previous frame's
    /// submission has completed. Otherwise buffers from earlier frames are
    /// submitted again.
    pub fn clear_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        if let Some(device) = &self.device {
            device.free_command_buffers(self.command_pool, &self.commands);
        }
        self.commands.clear();
    }

    /// Record the active visual tree targeting `target`
    ///
    /// Submission and synchronization are up to the caller.
    pub fn render_frame(&mut self, target: vk::Framebuffer) -> VulkanResult<()> {
        let mut vtree = self
            .vtree
            .try_borrow_mut()
            .map_err(|_| VulkanError::invalid("Active visual tree is borrowed during render"))?;

        let mut frame = FrameContext::new(
            self.device.as_deref(),
            &self.resources,
            &mut self.commands,
            target,
            self.command_pool,
            self.swapchain_extent,
        );
        vtree.render(&mut frame)
    }

    /// Active visual tree
    pub fn vtree(&self) -> &SharedVisualTree {
        &self.vtree
    }

    /// Make `vtree` the active tree and return the previous one
    ///
    /// The previous tree's `on_uninit` runs before the new tree's `on_init`.
    pub fn switch_vtree(&mut self, vtree: SharedVisualTree) -> SharedVisualTree {
        let old = std::mem::replace(&mut self.vtree, vtree);
        old.borrow_mut().on_uninit();
        self.vtree.borrow_mut().on_init();
        log::debug!("Switched active visual tree");
        old
    }
}

impl Drop for RenderManager {
    fn drop(&mut self) {
        self.clear_commands();
    }
}
