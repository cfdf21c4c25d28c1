//! Per-frame recording context
//!
//! [`FrameContext`] is what a visual tree receives from
//! [`RenderManager::render_frame`](super::RenderManager::render_frame).
//! Opening a pass yields a [`PassRecorder`] that nodes draw through; finishing
//! the recorder appends its command buffer to the frame's command sequence.

use ash::vk;

use crate::foundation::math::Transform2D;
use crate::render::resources::{BuiltinPipeline, BuiltinRenderPass, ResourceTable, Transform2dPushConstants};
use crate::render::vulkan::{is_null_handle, GpuDevice, VertexBuffer, VulkanError, VulkanResult};

/// Everything a visual tree needs to record one frame
pub struct FrameContext<'a> {
    device: Option<&'a dyn GpuDevice>,
    resources: &'a ResourceTable,
    commands: &'a mut Vec<vk::CommandBuffer>,
    target: vk::Framebuffer,
    command_pool: vk::CommandPool,
    extent: vk::Extent2D,
}

impl<'a> FrameContext<'a> {
    /// Create a context recording into `commands`
    pub fn new(
        device: Option<&'a dyn GpuDevice>,
        resources: &'a ResourceTable,
        commands: &'a mut Vec<vk::CommandBuffer>,
        target: vk::Framebuffer,
        command_pool: vk::CommandPool,
        extent: vk::Extent2D,
    ) -> Self {
        Self {
            device,
            resources,
            commands,
            target,
            command_pool,
            extent,
        }
    }

    /// Device to record with
    pub fn device(&self) -> VulkanResult<&'a dyn GpuDevice> {
        self.device
            .ok_or_else(|| VulkanError::invalid("No device has been set on the render manager"))
    }

    /// Builtin resources
    pub fn resources(&self) -> &ResourceTable {
        self.resources
    }

    /// Framebuffer being rendered to
    pub fn target(&self) -> vk::Framebuffer {
        self.target
    }

    /// Pool command buffers are allocated from
    pub fn command_pool(&self) -> vk::CommandPool {
        self.command_pool
    }

    /// Swapchain extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Command buffers recorded so far this frame
    pub fn commands(&self) -> &[vk::CommandBuffer] {
        self.commands
    }

    /// Allocate a command buffer and begin the builtin render pass `kind` on
    /// the target
    pub fn begin_pass(&mut self, kind: BuiltinRenderPass) -> VulkanResult<PassRecorder<'_>> {
        let device = self.device()?;
        let render_pass = self.resources.render_pass(kind);
        if is_null_handle(render_pass) {
            return Err(VulkanError::invalid(format!("{kind:?} render pass has not been created")));
        }

        let command_buffer = device.allocate_command_buffer(self.command_pool)?;
        if let Err(err) = device.begin_commands(command_buffer) {
            device.free_command_buffers(self.command_pool, &[command_buffer]);
            return Err(err);
        }
        device.cmd_begin_render_pass(command_buffer, render_pass, self.target, self.extent);
        log::trace!("Began {kind:?} pass");

        Ok(PassRecorder {
            device,
            resources: self.resources,
            commands: &mut *self.commands,
            command_pool: self.command_pool,
            command_buffer,
            submitted: false,
            extent: self.extent,
            bound_pipeline: None,
            bound_vertex_buffer: vk::Buffer::null(),
            draw_count: 0,
        })
    }
}

/// Records draws inside one render pass
///
/// Call [`finish`](Self::finish) to close the pass. A recorder dropped
/// without finishing, for example when a draw fails, returns its command
/// buffer to the pool.
pub struct PassRecorder<'a> {
    device: &'a dyn GpuDevice,
    resources: &'a ResourceTable,
    commands: &'a mut Vec<vk::CommandBuffer>,
    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
    submitted: bool,
    extent: vk::Extent2D,
    bound_pipeline: Option<BuiltinPipeline>,
    bound_vertex_buffer: vk::Buffer,
    draw_count: usize,
}

impl PassRecorder<'_> {
    /// Command buffer being recorded
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// Number of draws recorded so far
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Draw `vertices` with `pipeline`, placed by the world transform `world`
    pub fn draw_transformed(
        &mut self,
        pipeline: BuiltinPipeline,
        vertices: &VertexBuffer,
        world: &Transform2D,
    ) -> VulkanResult<()> {
        if self.bound_pipeline != Some(pipeline) {
            let handle = self.resources.pipeline(pipeline);
            if is_null_handle(handle) {
                return Err(VulkanError::invalid(format!("{pipeline:?} pipeline has not been created")));
            }
            self.device.cmd_bind_pipeline(self.command_buffer, handle);
            self.bound_pipeline = Some(pipeline);
        }

        if self.bound_vertex_buffer != vertices.handle() {
            self.device.cmd_bind_vertex_buffer(self.command_buffer, vertices.handle());
            self.bound_vertex_buffer = vertices.handle();
        }

        let constants = Transform2dPushConstants {
            position: [world.position.x, world.position.y],
            scale: [world.scale.x, world.scale.y],
            viewport: [self.extent.width as f32, self.extent.height as f32],
            _padding: [0.0; 2],
        };
        self.device.cmd_push_constants(
            self.command_buffer,
            self.resources.pipeline_layout(pipeline),
            bytemuck::bytes_of(&constants),
        );
        self.device.cmd_draw(self.command_buffer, vertices.vertex_count());
        self.draw_count += 1;
        Ok(())
    }

    /// End the pass and append the command buffer to the frame's sequence
    ///
    /// Returns the number of draws recorded.
    pub fn finish(mut self) -> VulkanResult<usize> {
        self.device.cmd_end_render_pass(self.command_buffer);
        self.device.end_commands(self.command_buffer)?;
        self.commands.push(self.command_buffer);
        self.submitted = true;
        log::trace!("Recorded pass with {} draws", self.draw_count);
        Ok(self.draw_count)
    }
}

impl Drop for PassRecorder<'_> {
    fn drop(&mut self) {
        if !self.submitted {
            log::warn!("Discarding unfinished pass after {} draws", self.draw_count);
            self.device
                .free_command_buffers(self.command_pool, &[self.command_buffer]);
        }
    }
}
