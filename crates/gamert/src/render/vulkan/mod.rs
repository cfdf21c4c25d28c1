//! Vulkan rendering backend
//!
//! Everything the core asks of the GPU goes through [`GpuDevice`]. The
//! wrappers in this module own the objects they create and release them on
//! drop, so a handle is never shared by two owners.

mod error;
mod device;
mod ash_device;
mod render_pass;
mod shader;
mod buffer;
pub mod vertex_layout;

pub use error::{VulkanError, VulkanResult};
pub use device::{
    GpuDevice, RawBuffer, RenderPassDesc, ColorAttachmentDesc, GraphicsPipelineDesc,
    FixedFunctionState, PUSH_CONSTANT_STAGES, is_null_handle,
};
pub use ash_device::AshDevice;
pub use render_pass::RenderPass;
pub use shader::{ShaderModule, GraphicsPipeline};
pub use buffer::VertexBuffer;
pub use vertex_layout::{VertexLayout, Vertex2dRgb};
