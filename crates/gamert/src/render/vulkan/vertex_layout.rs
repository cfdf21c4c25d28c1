//! Vertex formats of the builtin pipelines
//!
//! Each builtin vertex type has a matching [`VertexLayout`] describing how the
//! pipeline reads it from a buffer.

use ash::vk;
use bytemuck::{Pod, Zeroable};

/// Vertex with a 2D position and an RGB color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2dRgb {
    /// Position (location = 0)
    pub position: [f32; 2],
    /// Color (location = 1)
    pub color: [f32; 3],
}

impl Vertex2dRgb {
    /// Create a vertex
    pub const fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Layout of this vertex type at binding 0
    pub fn layout() -> VertexLayout {
        VertexLayout {
            binding: vk::VertexInputBindingDescription {
                binding: 0,
                stride: std::mem::size_of::<Self>() as u32,
                input_rate: vk::VertexInputRate::VERTEX,
            },
            attributes: vec![
                // Position attribute (location = 0)
                vk::VertexInputAttributeDescription {
                    binding: 0,
                    location: 0,
                    format: vk::Format::R32G32_SFLOAT,
                    offset: 0,
                },
                // Color attribute (location = 1)
                vk::VertexInputAttributeDescription {
                    binding: 0,
                    location: 1,
                    format: vk::Format::R32G32B32_SFLOAT,
                    offset: 8, // 2 * sizeof(f32) after position
                },
            ],
        }
    }
}

/// Unit quad centered on the origin, two clockwise triangles
pub const UNIT_QUAD: [Vertex2dRgb; 6] = [
    Vertex2dRgb::new([-0.5, -0.5], [1.0, 0.0, 0.0]),
    Vertex2dRgb::new([0.5, -0.5], [0.0, 1.0, 0.0]),
    Vertex2dRgb::new([0.5, 0.5], [0.0, 0.0, 1.0]),
    Vertex2dRgb::new([0.5, 0.5], [0.0, 0.0, 1.0]),
    Vertex2dRgb::new([-0.5, 0.5], [1.0, 1.0, 0.0]),
    Vertex2dRgb::new([-0.5, -0.5], [1.0, 0.0, 0.0]),
];

/// Vertex input binding and attributes for one vertex type
#[derive(Debug, Clone)]
pub struct VertexLayout {
    /// Binding description
    pub binding: vk::VertexInputBindingDescription,
    /// Attribute descriptions, ordered by location
    pub attributes: Vec<vk::VertexInputAttributeDescription>,
}
