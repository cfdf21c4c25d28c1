//! `GpuDevice` implementation over an `ash` logical device

use std::ffi::CStr;
use std::io::Cursor;

use ash::{vk, Device, Instance};

use super::device::{
    GpuDevice, GraphicsPipelineDesc, RawBuffer, RenderPassDesc, PUSH_CONSTANT_STAGES,
};
use super::error::{VulkanError, VulkanResult};

/// Logical device supplied by the platform layer
///
/// The device itself is not destroyed here; whoever created it does that
/// after every object created through this wrapper has been dropped.
pub struct AshDevice {
    device: Device,
    memory_properties: vk::PhysicalDeviceMemoryProperties,
}

impl AshDevice {
    /// Wrap an existing logical device
    pub fn new(instance: &Instance, physical_device: vk::PhysicalDevice, device: Device) -> Self {
        let memory_properties = unsafe {
            instance.get_physical_device_memory_properties(physical_device)
        };

        Self {
            device,
            memory_properties,
        }
    }

    /// Get the raw `ash` device
    pub fn raw(&self) -> &Device {
        &self.device
    }

    /// Find suitable memory type
    fn find_memory_type(&self, type_filter: u32, properties: vk::MemoryPropertyFlags) -> VulkanResult<u32> {
        (0..self.memory_properties.memory_type_count)
            .find(|&i| {
                (type_filter & (1 << i)) != 0
                    && self.memory_properties.memory_types[i as usize]
                        .property_flags
                        .contains(properties)
            })
            .ok_or(VulkanError::NoSuitableMemoryType)
    }

    fn upload(&self, memory: vk::DeviceMemory, data: &[u8]) -> VulkanResult<()> {
        unsafe {
            let ptr = self.device
                .map_memory(memory, 0, data.len() as vk::DeviceSize, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)?;
            std::ptr::copy_nonoverlapping(data.as_ptr(), ptr.cast::<u8>(), data.len());
            self.device.unmap_memory(memory);
        }
        Ok(())
    }
}

/// Entry point every builtin shader stage starts at
fn shader_entry_point() -> VulkanResult<&'static CStr> {
    CStr::from_bytes_with_nul(SHADER_ENTRY_POINT)
        .map_err(|e| VulkanError::InitializationFailed(format!("Invalid shader entry point: {e}")))
}

const SHADER_ENTRY_POINT: &[u8] = b"main\0";

impl GpuDevice for AshDevice {
    fn create_render_pass(&self, desc: &RenderPassDesc) -> VulkanResult<vk::RenderPass> {
        let color = desc.color_attachment;

        // Color attachment description
        let color_attachment = vk::AttachmentDescription::builder()
            .format(color.format)
            .samples(color.samples)
            .load_op(color.load_op)
            .store_op(color.store_op)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(color.initial_layout)
            .final_layout(color.final_layout)
            .build();
        let attachments = [color_attachment];

        let color_attachment_ref = vk::AttachmentReference::builder()
            .attachment(0)
            .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)
            .build();
        let color_attachments = [color_attachment_ref];

        let subpass = vk::SubpassDescription::builder()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachments)
            .build();
        let subpasses = [subpass];

        let render_pass_create_info = vk::RenderPassCreateInfo::builder()
            .attachments(&attachments)
            .subpasses(&subpasses);

        unsafe {
            self.device.create_render_pass(&render_pass_create_info, None)
                .map_err(VulkanError::Api)
        }
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        unsafe {
            self.device.destroy_render_pass(render_pass, None);
        }
    }

    fn create_shader_module(&self, code: &[u8]) -> VulkanResult<vk::ShaderModule> {
        // read_spv copes with unaligned input and checks the magic number
        let words = ash::util::read_spv(&mut Cursor::new(code))
            .map_err(|e| VulkanError::InitializationFailed(format!("Invalid SPIR-V bytecode: {e}")))?;

        let create_info = vk::ShaderModuleCreateInfo::builder().code(&words);

        unsafe {
            self.device.create_shader_module(&create_info, None)
                .map_err(VulkanError::Api)
        }
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe {
            self.device.destroy_shader_module(module, None);
        }
    }

    fn create_pipeline_layout(&self, push_constant_size: u32) -> VulkanResult<vk::PipelineLayout> {
        let push_constant_ranges = [vk::PushConstantRange {
            stage_flags: PUSH_CONSTANT_STAGES,
            offset: 0,
            size: push_constant_size,
        }];

        let mut layout_info = vk::PipelineLayoutCreateInfo::builder();
        if push_constant_size > 0 {
            layout_info = layout_info.push_constant_ranges(&push_constant_ranges);
        }

        unsafe {
            self.device.create_pipeline_layout(&layout_info, None)
                .map_err(VulkanError::Api)
        }
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        unsafe {
            self.device.destroy_pipeline_layout(layout, None);
        }
    }

    fn create_graphics_pipeline(&self, desc: &GraphicsPipelineDesc<'_>) -> VulkanResult<vk::Pipeline> {
        let entry_point = shader_entry_point()?;
        let state = desc.state;

        // Shader stages
        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(desc.vertex_shader)
                .name(entry_point)
                .build(),
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(desc.fragment_shader)
                .name(entry_point)
                .build(),
        ];

        // Vertex input
        let binding_descriptions = [desc.vertex_layout.binding];
        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&binding_descriptions)
            .vertex_attribute_descriptions(&desc.vertex_layout.attributes);

        // Input assembly
        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(state.topology)
            .primitive_restart_enable(false);

        // Viewport and scissor
        let viewport = vk::Viewport::builder()
            .x(0.0)
            .y(0.0)
            .width(desc.extent.width as f32)
            .height(desc.extent.height as f32)
            .min_depth(0.0)
            .max_depth(1.0)
            .build();

        let scissor = vk::Rect2D::builder()
            .offset(vk::Offset2D { x: 0, y: 0 })
            .extent(desc.extent)
            .build();

        let viewports = [viewport];
        let scissors = [scissor];
        let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
            .viewports(&viewports)
            .scissors(&scissors);

        // Rasterization
        let rasterizer = vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(state.polygon_mode)
            .line_width(state.line_width)
            .cull_mode(state.cull_mode)
            .front_face(state.front_face)
            .depth_bias_enable(false);

        // Multisampling
        let multisampling = vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);

        // Depth and stencil testing
        let depth_stencil = vk::PipelineDepthStencilStateCreateInfo::builder()
            .depth_test_enable(state.depth_test)
            .depth_write_enable(state.depth_test)
            .depth_compare_op(vk::CompareOp::LESS)
            .depth_bounds_test_enable(false)
            .stencil_test_enable(false);

        // Color blending
        let color_blend_attachment = if state.blend_enable {
            vk::PipelineColorBlendAttachmentState::builder()
                .color_write_mask(vk::ColorComponentFlags::RGBA)
                .blend_enable(true)
                .src_color_blend_factor(vk::BlendFactor::SRC_ALPHA)
                .dst_color_blend_factor(vk::BlendFactor::ONE_MINUS_SRC_ALPHA)
                .color_blend_op(vk::BlendOp::ADD)
                .src_alpha_blend_factor(vk::BlendFactor::ONE)
                .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
                .alpha_blend_op(vk::BlendOp::ADD)
                .build()
        } else {
            vk::PipelineColorBlendAttachmentState::builder()
                .color_write_mask(vk::ColorComponentFlags::RGBA)
                .blend_enable(false)
                .build()
        };

        let color_blend_attachments = [color_blend_attachment];
        let color_blending = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .logic_op(vk::LogicOp::COPY)
            .attachments(&color_blend_attachments)
            .blend_constants([0.0, 0.0, 0.0, 0.0]);

        let mut pipeline_info = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_info)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterizer)
            .multisample_state(&multisampling)
            .color_blend_state(&color_blending)
            .layout(desc.layout)
            .render_pass(desc.render_pass)
            .subpass(0);
        if state.depth_test {
            pipeline_info = pipeline_info.depth_stencil_state(&depth_stencil);
        }

        let pipelines = unsafe {
            self.device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_info.build()],
                None,
            ).map_err(|(_, err)| VulkanError::Api(err))?
        };

        pipelines.into_iter().next().ok_or_else(|| {
            VulkanError::InitializationFailed("Driver returned no graphics pipeline".to_string())
        })
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        unsafe {
            self.device.destroy_pipeline(pipeline, None);
        }
    }

    fn create_vertex_buffer(&self, data: &[u8]) -> VulkanResult<RawBuffer> {
        if data.is_empty() {
            return Err(VulkanError::invalid("Cannot create an empty vertex buffer"));
        }

        let buffer_info = vk::BufferCreateInfo::builder()
            .size(data.len() as vk::DeviceSize)
            .usage(vk::BufferUsageFlags::VERTEX_BUFFER)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe {
            self.device.create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?
        };

        let mem_requirements = unsafe {
            self.device.get_buffer_memory_requirements(buffer)
        };

        let memory_type_index = match self.find_memory_type(
            mem_requirements.memory_type_bits,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        ) {
            Ok(index) => index,
            Err(err) => {
                unsafe { self.device.destroy_buffer(buffer, None) };
                return Err(err);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(mem_requirements.size)
            .memory_type_index(memory_type_index);

        let memory = match unsafe { self.device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(err) => {
                unsafe { self.device.destroy_buffer(buffer, None) };
                return Err(VulkanError::Api(err));
            }
        };

        let raw = RawBuffer { buffer, memory };

        let bound = unsafe { self.device.bind_buffer_memory(buffer, memory, 0) }
            .map_err(VulkanError::Api)
            .and_then(|()| self.upload(memory, data));
        if let Err(err) = bound {
            self.destroy_buffer(raw);
            return Err(err);
        }

        Ok(raw)
    }

    fn destroy_buffer(&self, buffer: RawBuffer) {
        unsafe {
            self.device.destroy_buffer(buffer.buffer, None);
            self.device.free_memory(buffer.memory, None);
        }
    }

    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VulkanResult<vk::CommandBuffer> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);

        let command_buffers = unsafe {
            self.device.allocate_command_buffers(&alloc_info)
                .map_err(VulkanError::Api)?
        };

        command_buffers.into_iter().next().ok_or_else(|| {
            VulkanError::InitializationFailed("Driver returned no command buffer".to_string())
        })
    }

    fn free_command_buffers(&self, pool: vk::CommandPool, command_buffers: &[vk::CommandBuffer]) {
        if command_buffers.is_empty() {
            return;
        }
        unsafe {
            self.device.free_command_buffers(pool, command_buffers);
        }
    }

    fn begin_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        let begin_info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        unsafe {
            self.device.begin_command_buffer(command_buffer, &begin_info)
                .map_err(VulkanError::Api)
        }
    }

    fn end_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        unsafe {
            self.device.end_command_buffer(command_buffer)
                .map_err(VulkanError::Api)
        }
    }

    fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        extent: vk::Extent2D,
    ) {
        // Builtin passes never clear, so no clear values are needed
        let render_pass_begin = vk::RenderPassBeginInfo::builder()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            });

        unsafe {
            self.device.cmd_begin_render_pass(
                command_buffer,
                &render_pass_begin,
                vk::SubpassContents::INLINE,
            );
        }
    }

    fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        unsafe {
            self.device.cmd_end_render_pass(command_buffer);
        }
    }

    fn cmd_bind_pipeline(&self, command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline) {
        unsafe {
            self.device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, pipeline);
        }
    }

    fn cmd_bind_vertex_buffer(&self, command_buffer: vk::CommandBuffer, buffer: vk::Buffer) {
        unsafe {
            self.device.cmd_bind_vertex_buffers(command_buffer, 0, &[buffer], &[0]);
        }
    }

    fn cmd_push_constants(&self, command_buffer: vk::CommandBuffer, layout: vk::PipelineLayout, data: &[u8]) {
        unsafe {
            self.device.cmd_push_constants(command_buffer, layout, PUSH_CONSTANT_STAGES, 0, data);
        }
    }

    fn cmd_draw(&self, command_buffer: vk::CommandBuffer, vertex_count: u32) {
        unsafe {
            self.device.cmd_draw(command_buffer, vertex_count, 1, 0, 0);
        }
    }
}
