//! GPU device seam
//!
//! The device, swapchain and command pool are created by the platform layer.
//! The core only needs the handful of primitives below, described with plain
//! data so the same calls can be replayed against a recording device in tests.

use ash::vk;
use ash::vk::Handle;

use super::error::VulkanResult;
use super::vertex_layout::VertexLayout;

/// Shader stages that see the builtin push-constant block
pub const PUSH_CONSTANT_STAGES: vk::ShaderStageFlags = vk::ShaderStageFlags::VERTEX;

/// Whether `handle` is the null handle
pub fn is_null_handle<H: Handle>(handle: H) -> bool {
    handle.as_raw() == 0
}

/// A buffer together with its backing memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawBuffer {
    /// Buffer handle
    pub buffer: vk::Buffer,
    /// Device memory bound to the buffer
    pub memory: vk::DeviceMemory,
}

/// Single color attachment of a builtin render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttachmentDesc {
    /// Image format, the swapchain format for builtin passes
    pub format: vk::Format,
    /// Sample count
    pub samples: vk::SampleCountFlags,
    /// What happens to prior contents when the pass begins
    pub load_op: vk::AttachmentLoadOp,
    /// What happens to contents when the pass ends
    pub store_op: vk::AttachmentStoreOp,
    /// Layout the image is in before the pass
    pub initial_layout: vk::ImageLayout,
    /// Layout the image transitions to after the pass
    pub final_layout: vk::ImageLayout,
}

/// One-subpass, one-color-attachment render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPassDesc {
    /// The color attachment, referenced by the subpass as
    /// `COLOR_ATTACHMENT_OPTIMAL`
    pub color_attachment: ColorAttachmentDesc,
}

/// Fixed-function state baked into a graphics pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFunctionState {
    /// Primitive topology
    pub topology: vk::PrimitiveTopology,
    /// Polygon fill mode
    pub polygon_mode: vk::PolygonMode,
    /// Faces to cull
    pub cull_mode: vk::CullModeFlags,
    /// Winding that counts as front-facing
    pub front_face: vk::FrontFace,
    /// Rasterized line width
    pub line_width: f32,
    /// Depth test enabled
    pub depth_test: bool,
    /// Color blending enabled
    pub blend_enable: bool,
}

impl FixedFunctionState {
    /// Forward 2D state: filled triangles, back faces culled, clockwise front
    /// faces, no depth or stencil, no blending
    pub fn forward_2d() -> Self {
        Self {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::BACK,
            front_face: vk::FrontFace::CLOCKWISE,
            line_width: 1.0,
            depth_test: false,
            blend_enable: false,
        }
    }
}

/// Everything needed to create one graphics pipeline
#[derive(Debug, Clone, Copy)]
pub struct GraphicsPipelineDesc<'a> {
    /// Vertex stage module, entry point `main`
    pub vertex_shader: vk::ShaderModule,
    /// Fragment stage module, entry point `main`
    pub fragment_shader: vk::ShaderModule,
    /// Vertex input layout
    pub vertex_layout: &'a VertexLayout,
    /// Fixed-function state
    pub state: FixedFunctionState,
    /// Viewport and scissor size
    pub extent: vk::Extent2D,
    /// Pipeline layout
    pub layout: vk::PipelineLayout,
    /// Render pass the pipeline is compatible with, subpass 0
    pub render_pass: vk::RenderPass,
}

/// GPU primitives consumed by the rendering core
///
/// Implementations do not track ownership; the wrappers in this module do.
pub trait GpuDevice {
    /// Create a render pass
    fn create_render_pass(&self, desc: &RenderPassDesc) -> VulkanResult<vk::RenderPass>;
    /// Destroy a render pass
    fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// Create a shader module from SPIR-V bytes
    fn create_shader_module(&self, code: &[u8]) -> VulkanResult<vk::ShaderModule>;
    /// Destroy a shader module
    fn destroy_shader_module(&self, module: vk::ShaderModule);

    /// Create a pipeline layout with no descriptor sets and, when
    /// `push_constant_size` is non-zero, one push-constant range
    fn create_pipeline_layout(&self, push_constant_size: u32) -> VulkanResult<vk::PipelineLayout>;
    /// Destroy a pipeline layout
    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);

    /// Create a graphics pipeline
    fn create_graphics_pipeline(&self, desc: &GraphicsPipelineDesc<'_>) -> VulkanResult<vk::Pipeline>;
    /// Destroy a pipeline
    fn destroy_pipeline(&self, pipeline: vk::Pipeline);

    /// Create a host-visible vertex buffer initialized with `data`
    fn create_vertex_buffer(&self, data: &[u8]) -> VulkanResult<RawBuffer>;
    /// Destroy a buffer and free its memory
    fn destroy_buffer(&self, buffer: RawBuffer);

    /// Allocate one primary command buffer from `pool`
    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VulkanResult<vk::CommandBuffer>;
    /// Return command buffers to `pool`; none of them may be pending execution
    fn free_command_buffers(&self, pool: vk::CommandPool, command_buffers: &[vk::CommandBuffer]);
    /// Begin recording
    fn begin_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()>;
    /// Finish recording
    fn end_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()>;

    /// Begin `render_pass` on `framebuffer`, rendering the full `extent`
    fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        extent: vk::Extent2D,
    );
    /// End the current render pass
    fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer);
    /// Bind a graphics pipeline
    fn cmd_bind_pipeline(&self, command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline);
    /// Bind a vertex buffer at binding 0
    fn cmd_bind_vertex_buffer(&self, command_buffer: vk::CommandBuffer, buffer: vk::Buffer);
    /// Upload push constants for [`PUSH_CONSTANT_STAGES`] at offset 0
    fn cmd_push_constants(&self, command_buffer: vk::CommandBuffer, layout: vk::PipelineLayout, data: &[u8]);
    /// Draw `vertex_count` vertices, one instance
    fn cmd_draw(&self, command_buffer: vk::CommandBuffer, vertex_count: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle_detection() {
        assert!(is_null_handle(vk::Pipeline::null()));
        assert!(is_null_handle(vk::RenderPass::null()));
        assert!(is_null_handle(vk::PipelineLayout::null()));
        assert!(!is_null_handle(vk::Pipeline::from_raw(0x10)));
    }
}
