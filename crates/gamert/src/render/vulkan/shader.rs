//! Shader modules and graphics pipelines
//!
//! SPIR-V shader modules and graphics pipeline ownership following RAII patterns

use std::rc::Rc;

use ash::vk;

use super::device::{FixedFunctionState, GpuDevice, GraphicsPipelineDesc};
use super::error::VulkanResult;
use super::vertex_layout::VertexLayout;

/// Shader module wrapper with RAII cleanup
///
/// Modules are only needed while a pipeline is being created; keep them in a
/// local scope so they are released right after.
pub struct ShaderModule {
    device: Rc<dyn GpuDevice>,
    module: vk::ShaderModule,
}

impl ShaderModule {
    /// Create shader module from SPIR-V bytecode
    pub fn from_bytes(device: Rc<dyn GpuDevice>, bytes: &[u8]) -> VulkanResult<Self> {
        let module = device.create_shader_module(bytes)?;
        Ok(Self { device, module })
    }

    /// Get shader module handle
    pub fn handle(&self) -> vk::ShaderModule {
        self.module
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        self.device.destroy_shader_module(self.module);
    }
}

/// Graphics pipeline wrapper with RAII cleanup
///
/// Owns both the pipeline and its layout.
pub struct GraphicsPipeline {
    device: Rc<dyn GpuDevice>,
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
}

impl GraphicsPipeline {
    /// Create a forward 2D graphics pipeline
    ///
    /// Viewport and scissor are fixed to `extent`; a new extent needs a new
    /// pipeline.
    pub fn new(
        device: Rc<dyn GpuDevice>,
        render_pass: vk::RenderPass,
        vertex_shader: &ShaderModule,
        fragment_shader: &ShaderModule,
        vertex_layout: &VertexLayout,
        extent: vk::Extent2D,
        push_constant_size: u32,
    ) -> VulkanResult<Self> {
        let layout = device.create_pipeline_layout(push_constant_size)?;

        let desc = GraphicsPipelineDesc {
            vertex_shader: vertex_shader.handle(),
            fragment_shader: fragment_shader.handle(),
            vertex_layout,
            state: FixedFunctionState::forward_2d(),
            extent,
            layout,
            render_pass,
        };

        let pipeline = match device.create_graphics_pipeline(&desc) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                device.destroy_pipeline_layout(layout);
                return Err(err);
            }
        };

        Ok(Self {
            device,
            pipeline,
            layout,
        })
    }

    /// Get pipeline handle
    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }

    /// Get layout handle
    pub fn layout(&self) -> vk::PipelineLayout {
        self.layout
    }
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        self.device.destroy_pipeline(self.pipeline);
        self.device.destroy_pipeline_layout(self.layout);
    }
}
