//! Builtin render pass and pipeline table
//!
//! Maps the closed sets of builtin render passes and pipelines to the GPU
//! objects created for the current device, format and extent. Creation is
//! all-or-nothing; destruction resets entries to the null handle and may be
//! repeated freely.
//!
//! Destroying entries while submitted frames still use them is undefined on
//! the GPU side. Callers wait for the device to go idle first.

use std::collections::HashMap;
use std::rc::Rc;

use ash::vk;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::assets::ResourceLoader;
use crate::config::{PipelineShaders, RendererConfig};
use crate::render::vulkan::{
    is_null_handle, ColorAttachmentDesc, GpuDevice, GraphicsPipeline, RenderPass, RenderPassDesc, ShaderModule,
    Vertex2dRgb, VertexLayout, VulkanError, VulkanResult,
};

/// Builtin render pass configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinRenderPass {
    /// Main pass; prior attachment contents are discarded
    Default,
    /// Overlay pass drawn after `Default`; prior contents are kept
    CleanUp,
}

impl BuiltinRenderPass {
    /// Every builtin render pass
    pub const ALL: [Self; 2] = [Self::Default, Self::CleanUp];

    /// Load operation of the color attachment
    pub fn load_op(self) -> vk::AttachmentLoadOp {
        match self {
            Self::Default => vk::AttachmentLoadOp::DONT_CARE,
            Self::CleanUp => vk::AttachmentLoadOp::LOAD,
        }
    }

    /// Describe this pass for a swapchain image `format`
    pub fn describe(self, format: vk::Format) -> RenderPassDesc {
        RenderPassDesc {
            color_attachment: ColorAttachmentDesc {
                format,
                samples: vk::SampleCountFlags::TYPE_1,
                load_op: self.load_op(),
                store_op: vk::AttachmentStoreOp::STORE,
                initial_layout: vk::ImageLayout::UNDEFINED,
                final_layout: vk::ImageLayout::PRESENT_SRC_KHR,
            },
        }
    }
}

/// Builtin pipelines, one per builtin vertex format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinPipeline {
    /// 2D position + RGB color vertices
    Pos2dRgbColor,
}

impl BuiltinPipeline {
    /// Every builtin pipeline
    pub const ALL: [Self; 1] = [Self::Pos2dRgbColor];

    /// Shader sources shipped with the engine
    pub fn default_shaders(self) -> PipelineShaders {
        match self {
            Self::Pos2dRgbColor => PipelineShaders::new(
                self,
                "shaders/simple_2drgb.vert.spv",
                "shaders/simple_2drgb.frag.spv",
            ),
        }
    }

    /// Vertex input layout
    pub fn vertex_layout(self) -> VertexLayout {
        match self {
            Self::Pos2dRgbColor => Vertex2dRgb::layout(),
        }
    }

    /// Size of the push-constant block in bytes
    pub fn push_constant_size(self) -> u32 {
        match self {
            Self::Pos2dRgbColor => std::mem::size_of::<Transform2dPushConstants>() as u32,
        }
    }
}

/// Per-draw push constants of [`BuiltinPipeline::Pos2dRgbColor`]
///
/// Positions and scales are in pixels with the origin at the viewport
/// center; the vertex shader divides by `viewport` to reach clip space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Transform2dPushConstants {
    /// World position
    pub position: [f32; 2],
    /// World scale
    pub scale: [f32; 2],
    /// Viewport size
    pub viewport: [f32; 2],
    /// std430 padding
    pub _padding: [f32; 2],
}

struct PipelineEntry {
    shaders: PipelineShaders,
    pipeline: Option<GraphicsPipeline>,
}

/// Owns the builtin render passes and pipelines
#[derive(Default)]
pub struct ResourceTable {
    render_passes: HashMap<BuiltinRenderPass, RenderPass>,
    pipelines: HashMap<BuiltinPipeline, PipelineEntry>,
}

impl ResourceTable {
    /// Create a table with no registered pipelines
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table registering every pipeline listed in `config`
    pub fn from_config(config: &RendererConfig) -> Self {
        let mut table = Self::new();
        for shaders in &config.pipelines {
            table.register_pipeline(shaders.clone());
        }
        table
    }

    /// Register (or re-register) a pipeline's shader sources
    ///
    /// Other entries are untouched. Re-registering drops any pipeline already
    /// created for the entry.
    pub fn register_pipeline(&mut self, shaders: PipelineShaders) {
        self.pipelines.insert(
            shaders.pipeline,
            PipelineEntry {
                shaders,
                pipeline: None,
            },
        );
    }

    /// Whether `id` has been registered
    pub fn is_registered(&self, id: BuiltinPipeline) -> bool {
        self.pipelines.contains_key(&id)
    }

    /// Create every builtin render pass for the swapchain `format`
    pub fn create_renderpasses(&mut self, device: &Rc<dyn GpuDevice>, format: vk::Format) -> VulkanResult<()> {
        let mut created = HashMap::with_capacity(BuiltinRenderPass::ALL.len());
        for kind in BuiltinRenderPass::ALL {
            // Early return drops anything created so far
            let render_pass = RenderPass::new(Rc::clone(device), &kind.describe(format))?;
            log::debug!("Created {kind:?} render pass ({format:?})");
            created.insert(kind, render_pass);
        }

        if !self.render_passes.is_empty() {
            log::warn!("Replacing existing render passes");
        }
        self.render_passes = created;
        Ok(())
    }

    /// Create every registered pipeline against the `Default` render pass
    ///
    /// On failure every pipeline created by this call is released again.
    pub fn create_pipelines(
        &mut self,
        device: &Rc<dyn GpuDevice>,
        loader: &dyn ResourceLoader,
        extent: vk::Extent2D,
    ) -> VulkanResult<()> {
        let render_pass = self.render_pass(BuiltinRenderPass::Default);
        if is_null_handle(render_pass) {
            return Err(VulkanError::invalid(
                "Render passes must be created before pipelines",
            ));
        }

        let mut created = Vec::with_capacity(self.pipelines.len());
        for (&id, entry) in &self.pipelines {
            let pipeline = Self::create_pipeline(device, loader, render_pass, id, &entry.shaders, extent)?;
            log::debug!("Created {id:?} pipeline ({}x{})", extent.width, extent.height);
            created.push((id, pipeline));
        }

        for (id, pipeline) in created {
            if let Some(entry) = self.pipelines.get_mut(&id) {
                entry.pipeline = Some(pipeline);
            }
        }
        Ok(())
    }

    fn create_pipeline(
        device: &Rc<dyn GpuDevice>,
        loader: &dyn ResourceLoader,
        render_pass: vk::RenderPass,
        id: BuiltinPipeline,
        shaders: &PipelineShaders,
        extent: vk::Extent2D,
    ) -> VulkanResult<GraphicsPipeline> {
        let vertex_shader = Self::load_shader(device, loader, &shaders.vertex_shader_path)?;
        let fragment_shader = Self::load_shader(device, loader, &shaders.fragment_shader_path)?;

        GraphicsPipeline::new(
            Rc::clone(device),
            render_pass,
            &vertex_shader,
            &fragment_shader,
            &id.vertex_layout(),
            extent,
            id.push_constant_size(),
        )
        // shader modules dropped here
    }

    fn load_shader(
        device: &Rc<dyn GpuDevice>,
        loader: &dyn ResourceLoader,
        path: &std::path::Path,
    ) -> VulkanResult<ShaderModule> {
        let code = loader.read_binary_file(path).map_err(|source| VulkanError::ResourceLoad {
            path: path.to_path_buf(),
            source,
        })?;
        ShaderModule::from_bytes(Rc::clone(device), &code)
    }

    /// Release every render pass
    pub fn destroy_renderpasses(&mut self) {
        if !self.render_passes.is_empty() {
            log::debug!("Destroying {} render passes", self.render_passes.len());
        }
        self.render_passes.clear();
    }

    /// Release every pipeline, keeping the registrations
    pub fn destroy_pipelines(&mut self) {
        for (id, entry) in &mut self.pipelines {
            if entry.pipeline.take().is_some() {
                log::debug!("Destroyed {id:?} pipeline");
            }
        }
    }

    /// Render pass handle, null when not created
    pub fn render_pass(&self, kind: BuiltinRenderPass) -> vk::RenderPass {
        self.render_passes
            .get(&kind)
            .map_or_else(vk::RenderPass::null, RenderPass::handle)
    }

    /// Pipeline handle, null when not created
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn pipeline(&self, id: BuiltinPipeline) -> vk::Pipeline {
        self.entry(id)
            .pipeline
            .as_ref()
            .map_or_else(vk::Pipeline::null, GraphicsPipeline::handle)
    }

    /// Pipeline layout handle, null when not created
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn pipeline_layout(&self, id: BuiltinPipeline) -> vk::PipelineLayout {
        self.entry(id)
            .pipeline
            .as_ref()
            .map_or_else(vk::PipelineLayout::null, GraphicsPipeline::layout)
    }

    /// Shader sources registered for `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was never registered.
    pub fn shaders(&self, id: BuiltinPipeline) -> &PipelineShaders {
        &self.entry(id).shaders
    }

    fn entry(&self, id: BuiltinPipeline) -> &PipelineEntry {
        match self.pipelines.get(&id) {
            Some(entry) => entry,
            None => panic!("builtin pipeline {id:?} is not registered"),
        }
    }
}
