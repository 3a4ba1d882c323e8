//! # Vertex Data Structures
//!
//! GPU-compatible vertex format for the 2D pipeline. Positions are logical
//! screen pixels; the shader maps them to clip space using the screen-size
//! uniform.

/// A 2D vertex with position and straight-alpha RGBA color.
///
/// `#[repr(C)]` keeps the layout C-compatible for GPU buffer uploads.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    /// Logical-pixel position [x, y], y-down.
    pub position: [f32; 2],
    /// Straight-alpha RGBA color.
    pub color: [f32; 4],
}

impl Vertex2D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    /// Vertex buffer layout for pipeline creation.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
