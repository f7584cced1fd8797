//! Vertex buffer layouts.

use deskscene_core::MeshVertex;

/// Types that can be bound as a vertex buffer.
pub trait VertexLayout {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

const MESH_VERTEX_ATTRIBS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

impl VertexLayout for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_VERTEX_ATTRIBS,
        }
    }
}
