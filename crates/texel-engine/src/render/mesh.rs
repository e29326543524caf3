use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::RenderCtx;

/// Interleaved position + texture coordinate.
///
/// Layout: location 0 = position (`Float32x3`), location 1 = uv (`Float32x2`),
/// 5 floats per vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub const FLOATS: usize = 5;

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Static, non-indexed vertex buffer drawn as a triangle list.
pub struct Mesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl Mesh {
    /// Uploads `vertices` once. The buffer is immutable afterwards.
    pub fn new(ctx: &RenderCtx<'_>, label: &str, vertices: &[TexturedVertex]) -> Self {
        let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!(
            "mesh {label:?}: {} vertices, {} bytes",
            vertices.len(),
            std::mem::size_of_val(vertices)
        );

        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Binds the buffer at slot 0 and draws every vertex.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
