//! Recording device and in-memory loader used by unit tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use ash::vk;
use ash::vk::Handle;

use crate::assets::ResourceLoader;
use crate::render::resources::{BuiltinPipeline, Transform2dPushConstants};
use crate::render::vulkan::{
    FixedFunctionState, GpuDevice, GraphicsPipelineDesc, RawBuffer, RenderPassDesc, VulkanError,
    VulkanResult,
};

/// What a pipeline was created with
#[derive(Debug, Clone)]
pub(crate) struct PipelineSnapshot {
    pub handle: vk::Pipeline,
    pub state: FixedFunctionState,
    pub extent: vk::Extent2D,
    pub render_pass: vk::RenderPass,
    pub vertex_stride: u32,
    pub push_constant_size: u32,
}

#[derive(Debug, Clone)]
pub(crate) enum Call {
    CreateRenderPass(RenderPassDesc),
    DestroyRenderPass(vk::RenderPass),
    CreateShaderModule { len: usize },
    DestroyShaderModule(vk::ShaderModule),
    CreatePipelineLayout { push_constant_size: u32 },
    DestroyPipelineLayout(vk::PipelineLayout),
    CreatePipeline(PipelineSnapshot),
    DestroyPipeline(vk::Pipeline),
    CreateBuffer { len: usize },
    DestroyBuffer(vk::Buffer),
    AllocateCommandBuffer(vk::CommandPool),
    FreeCommandBuffers(Vec<vk::CommandBuffer>),
    BeginCommands(vk::CommandBuffer),
    EndCommands(vk::CommandBuffer),
    BeginRenderPass {
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
    },
    EndRenderPass,
    BindPipeline(vk::Pipeline),
    BindVertexBuffer(vk::Buffer),
    PushConstants(Vec<u8>),
    Draw { vertex_count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailPoint {
    RenderPass,
    ShaderModule,
    PipelineLayout,
    Pipeline,
    Buffer,
    BeginCommands,
}

/// In-memory `GpuDevice` that hands out unique fake handles and records calls
///
/// Command buffers count as live objects until freed. Destroying a handle that
/// is not live panics, which catches double frees.
pub(crate) struct MockDevice {
    next_handle: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    layouts: RefCell<HashMap<u64, u32>>,
    calls: RefCell<Vec<Call>>,
    fail: Cell<Option<(FailPoint, usize)>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_handle: Cell::new(1),
            live: RefCell::new(HashSet::new()),
            layouts: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            fail: Cell::new(None),
        }
    }

    /// Fail the next creation at `point`
    pub fn fail_on(&self, point: FailPoint) {
        self.fail_on_nth(point, 0);
    }

    /// Fail the creation at `point` after `skip` successful ones
    pub fn fail_on_nth(&self, point: FailPoint, skip: usize) {
        self.fail.set(Some((point, skip)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_live(&self, raw: u64) -> bool {
        self.live.borrow().contains(&raw)
    }

    pub fn created_render_passes(&self) -> Vec<RenderPassDesc> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::CreateRenderPass(desc) => Some(*desc),
                _ => None,
            })
            .collect()
    }

    pub fn created_pipelines(&self) -> Vec<PipelineSnapshot> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::CreatePipeline(snapshot) => Some(snapshot.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Draw { .. }))
            .count()
    }

    pub fn pushed_transforms(&self) -> Vec<Transform2dPushConstants> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::PushConstants(bytes) => Some(bytemuck::pod_read_unaligned(bytes)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check_fail(&self, point: FailPoint) -> VulkanResult<()> {
        match self.fail.get() {
            Some((p, 0)) if p == point => {
                self.fail.set(None);
                Err(VulkanError::Api(vk::Result::ERROR_INITIALIZATION_FAILED))
            }
            Some((p, n)) if p == point => {
                self.fail.set(Some((p, n - 1)));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn allocate(&self) -> u64 {
        let raw = self.next_handle.get();
        self.next_handle.set(raw + 1);
        raw
    }

    fn acquire(&self) -> u64 {
        let raw = self.allocate();
        self.live.borrow_mut().insert(raw);
        raw
    }

    fn release(&self, raw: u64) {
        assert!(self.live.borrow_mut().remove(&raw), "handle {raw} destroyed twice or never created");
    }
}

impl GpuDevice for MockDevice {
    fn create_render_pass(&self, desc: &RenderPassDesc) -> VulkanResult<vk::RenderPass> {
        self.check_fail(FailPoint::RenderPass)?;
        self.record(Call::CreateRenderPass(*desc));
        Ok(vk::RenderPass::from_raw(self.acquire()))
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.record(Call::DestroyRenderPass(render_pass));
        self.release(render_pass.as_raw());
    }

    fn create_shader_module(&self, code: &[u8]) -> VulkanResult<vk::ShaderModule> {
        self.check_fail(FailPoint::ShaderModule)?;
        self.record(Call::CreateShaderModule { len: code.len() });
        Ok(vk::ShaderModule::from_raw(self.acquire()))
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.record(Call::DestroyShaderModule(module));
        self.release(module.as_raw());
    }

    fn create_pipeline_layout(&self, push_constant_size: u32) -> VulkanResult<vk::PipelineLayout> {
        self.check_fail(FailPoint::PipelineLayout)?;
        self.record(Call::CreatePipelineLayout { push_constant_size });
        let raw = self.acquire();
        self.layouts.borrow_mut().insert(raw, push_constant_size);
        Ok(vk::PipelineLayout::from_raw(raw))
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.record(Call::DestroyPipelineLayout(layout));
        self.release(layout.as_raw());
    }

    fn create_graphics_pipeline(&self, desc: &GraphicsPipelineDesc<'_>) -> VulkanResult<vk::Pipeline> {
        self.check_fail(FailPoint::Pipeline)?;
        assert!(self.is_live(desc.vertex_shader.as_raw()), "vertex shader not live");
        assert!(self.is_live(desc.fragment_shader.as_raw()), "fragment shader not live");
        assert!(self.is_live(desc.render_pass.as_raw()), "render pass not live");

        let handle = vk::Pipeline::from_raw(self.acquire());
        let push_constant_size = self
            .layouts
            .borrow()
            .get(&desc.layout.as_raw())
            .copied()
            .unwrap_or_default();
        self.record(Call::CreatePipeline(PipelineSnapshot {
            handle,
            state: desc.state,
            extent: desc.extent,
            render_pass: desc.render_pass,
            vertex_stride: desc.vertex_layout.binding.stride,
            push_constant_size,
        }));
        Ok(handle)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.record(Call::DestroyPipeline(pipeline));
        self.release(pipeline.as_raw());
    }

    fn create_vertex_buffer(&self, data: &[u8]) -> VulkanResult<RawBuffer> {
        self.check_fail(FailPoint::Buffer)?;
        self.record(Call::CreateBuffer { len: data.len() });
        Ok(RawBuffer {
            buffer: vk::Buffer::from_raw(self.acquire()),
            memory: vk::DeviceMemory::from_raw(self.allocate()),
        })
    }

    fn destroy_buffer(&self, buffer: RawBuffer) {
        self.record(Call::DestroyBuffer(buffer.buffer));
        self.release(buffer.buffer.as_raw());
    }

    fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VulkanResult<vk::CommandBuffer> {
        self.record(Call::AllocateCommandBuffer(pool));
        Ok(vk::CommandBuffer::from_raw(self.acquire()))
    }

    fn free_command_buffers(&self, _pool: vk::CommandPool, command_buffers: &[vk::CommandBuffer]) {
        self.record(Call::FreeCommandBuffers(command_buffers.to_vec()));
        for command_buffer in command_buffers {
            self.release(command_buffer.as_raw());
        }
    }

    fn begin_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        self.check_fail(FailPoint::BeginCommands)?;
        self.record(Call::BeginCommands(command_buffer));
        Ok(())
    }

    fn end_commands(&self, command_buffer: vk::CommandBuffer) -> VulkanResult<()> {
        self.record(Call::EndCommands(command_buffer));
        Ok(())
    }

    fn cmd_begin_render_pass(
        &self,
        _command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        _extent: vk::Extent2D,
    ) {
        self.record(Call::BeginRenderPass { render_pass, framebuffer });
    }

    fn cmd_end_render_pass(&self, _command_buffer: vk::CommandBuffer) {
        self.record(Call::EndRenderPass);
    }

    fn cmd_bind_pipeline(&self, _command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline) {
        self.record(Call::BindPipeline(pipeline));
    }

    fn cmd_bind_vertex_buffer(&self, _command_buffer: vk::CommandBuffer, buffer: vk::Buffer) {
        self.record(Call::BindVertexBuffer(buffer));
    }

    fn cmd_push_constants(&self, _command_buffer: vk::CommandBuffer, _layout: vk::PipelineLayout, data: &[u8]) {
        self.record(Call::PushConstants(data.to_vec()));
    }

    fn cmd_draw(&self, _command_buffer: vk::CommandBuffer, vertex_count: u32) {
        self.record(Call::Draw { vertex_count });
    }
}

/// Loader serving files from a map
#[derive(Default)]
pub(crate) struct MemoryLoader {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader holding fake SPIR-V for every builtin pipeline's default shaders
    pub fn with_default_shaders() -> Self {
        let mut loader = Self::new();
        for id in BuiltinPipeline::ALL {
            let shaders = id.default_shaders();
            loader.insert(shaders.vertex_shader_path, fake_spirv());
            loader.insert(shaders.fragment_shader_path, fake_spirv());
        }
        loader
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }
}

impl ResourceLoader for MemoryLoader {
    fn read_binary_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

fn fake_spirv() -> Vec<u8> {
    let mut bytes = 0x0723_0203_u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0; 16]);
    bytes
}
