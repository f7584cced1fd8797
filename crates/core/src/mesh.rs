//! Mesh building utilities for procedural 3D geometry.
//!
//! Meshes are indexed triangle lists with position, normal and texture
//! coordinate data. Counter-clockwise winding is front facing.

use glam::{Vec2, Vec3};

/// Vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            tex_coords: tex_coords.into(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }

    pub fn tex_coords(&self) -> Vec2 {
        Vec2::from(self.tex_coords)
    }
}

/// Built mesh data ready for GPU upload.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [&MeshVertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Face normal from counter-clockwise winding, or `fallback` for degenerate faces.
pub fn face_normal(p1: Vec3, p2: Vec3, p3: Vec3, fallback: Vec3) -> Vec3 {
    let n = (p2 - p1).cross(p3 - p1);
    if n.length_squared() > f32::EPSILON {
        n.normalize()
    } else {
        fallback
    }
}

/// Fluent mesh builder for procedural geometry.
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3, tex_coords: Vec2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices
            .push(MeshVertex::new(position, normal, tex_coords));
        index
    }

    /// Add a triangle from existing vertex indices.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> &mut Self {
        debug_assert!(
            (a.max(b).max(c) as usize) < self.vertices.len(),
            "triangle references a vertex that has not been added"
        );
        self.indices.extend_from_slice(&[a, b, c]);
        self
    }

    /// Add a triangle with its own vertices and a normal computed from winding.
    pub fn add_flat_triangle(
        &mut self,
        positions: [Vec3; 3],
        uvs: [Vec2; 3],
        fallback_normal: Vec3,
    ) -> &mut Self {
        let normal = face_normal(positions[0], positions[1], positions[2], fallback_normal);
        let a = self.add_vertex(positions[0], normal, uvs[0]);
        let b = self.add_vertex(positions[1], normal, uvs[1]);
        let c = self.add_vertex(positions[2], normal, uvs[2]);
        self.add_triangle(a, b, c)
    }

    /// Add a quad (two triangles sharing four vertices) with one face normal.
    ///
    /// Corners are given counter-clockwise; triangles are (0, 1, 2) and (0, 2, 3).
    pub fn add_flat_quad(
        &mut self,
        positions: [Vec3; 4],
        uvs: [Vec2; 4],
        fallback_normal: Vec3,
    ) -> &mut Self {
        // A quad may fold into a triangle when one edge collapses, so try the
        // second diagonal before falling back.
        let first = face_normal(positions[0], positions[1], positions[2], Vec3::ZERO);
        let normal = if first != Vec3::ZERO {
            first
        } else {
            face_normal(positions[0], positions[2], positions[3], fallback_normal)
        };

        let base = self.vertices.len() as u32;
        for (position, uv) in positions.into_iter().zip(uvs) {
            self.add_vertex(position, normal, uv);
        }
        self.add_triangle(base, base + 1, base + 2);
        self.add_triangle(base, base + 2, base + 3);
        self
    }

    /// Build the final mesh data.
    pub fn build(&self) -> MeshData {
        MeshData {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Build and consume the builder.
    pub fn finish(self) -> MeshData {
        MeshData {
            vertices: self.vertices,
            indices: self.indices,
        }
    }
}
