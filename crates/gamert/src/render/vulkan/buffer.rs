//! Buffer management for vertex data

use std::rc::Rc;

use ash::vk;
use bytemuck::Pod;

use super::device::{GpuDevice, RawBuffer};
use super::error::VulkanResult;

/// Vertex buffer wrapper with RAII cleanup
pub struct VertexBuffer {
    device: Rc<dyn GpuDevice>,
    raw: RawBuffer,
    vertex_count: u32,
}

impl VertexBuffer {
    /// Create a vertex buffer holding `vertices`
    pub fn new<V: Pod>(device: Rc<dyn GpuDevice>, vertices: &[V]) -> VulkanResult<Self> {
        let raw = device.create_vertex_buffer(bytemuck::cast_slice(vertices))?;
        Ok(Self {
            device,
            raw,
            vertex_count: vertices.len() as u32,
        })
    }

    /// Get the buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.raw.buffer
    }

    /// Number of vertices stored
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.device.destroy_buffer(self.raw);
    }
}
