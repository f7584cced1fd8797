//! GPU-resident meshes.

use std::collections::HashMap;

use deskscene_core::{MeshData, MeshError, Primitive};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device};

/// Vertex and index buffers for one mesh.
pub struct GpuMesh {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.index_count(),
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Meshes keyed by [`Primitive::key`], so identical shapes share buffers.
#[derive(Default)]
pub struct MeshCache {
    meshes: HashMap<String, GpuMesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and upload `primitive` unless an equal one is already cached.
    pub fn ensure(&mut self, device: &Device, primitive: &Primitive) -> Result<(), MeshError> {
        let key = primitive.key();
        if self.meshes.contains_key(&key) {
            return Ok(());
        }
        let data = primitive.build()?;
        tracing::debug!(
            "Uploading mesh {key}: {} vertices, {} triangles",
            data.vertex_count(),
            data.triangle_count()
        );
        self.meshes.insert(key.clone(), GpuMesh::upload(device, &key, &data));
        Ok(())
    }

    pub fn get(&self, primitive: &Primitive) -> Option<&GpuMesh> {
        self.meshes.get(&primitive.key())
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }
}
