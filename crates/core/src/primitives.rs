//! Parametric primitive shapes.
//!
//! Every shape is unit sized and centred on the origin; placement is left to
//! the model transform. Texture coordinates follow the bottom-left origin
//! convention (v = 0 at the bottom of the image).

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::mesh::{MeshBuilder, MeshData};

/// Default number of slices around a cylinder.
pub const DEFAULT_CYLINDER_SLICES: u32 = 24;
/// Default number of rings and segments of a sphere.
pub const DEFAULT_SPHERE_COMPLEXITY: u32 = 32;
/// Upper bound on cylinder slices and sphere complexity.
pub const MAX_SEGMENTS: u32 = 1024;

/// Error type for primitive generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("{face} height must be between 0 and 1, got {value}")]
    InvalidHeight { face: &'static str, value: f32 },

    #[error("{shape} needs at least {min} segments, got {got}")]
    TooFewSegments {
        shape: &'static str,
        min: u32,
        got: u32,
    },

    #[error("{shape} allows at most {max} segments, got {got}")]
    TooManySegments {
        shape: &'static str,
        max: u32,
        got: u32,
    },
}

/// A 2x2 quad in the XZ plane facing +Y.
pub fn plane() -> MeshData {
    let mut builder = MeshBuilder::with_capacity(4, 6);

    let top_left = builder.add_vertex(Vec3::new(-1.0, 0.0, 1.0), Vec3::Y, Vec2::new(0.0, 1.0));
    let top_right = builder.add_vertex(Vec3::new(1.0, 0.0, 1.0), Vec3::Y, Vec2::new(1.0, 1.0));
    let bottom_right = builder.add_vertex(Vec3::new(1.0, 0.0, -1.0), Vec3::Y, Vec2::new(1.0, 0.0));
    let bottom_left = builder.add_vertex(Vec3::new(-1.0, 0.0, -1.0), Vec3::Y, Vec2::new(0.0, 0.0));

    builder
        .add_triangle(bottom_left, top_left, top_right)
        .add_triangle(top_right, bottom_right, bottom_left);

    builder.finish()
}

/// A cube spanning [-1, 1] on every axis.
pub fn cube() -> MeshData {
    build_wedge(1.0, 1.0)
}

/// A box whose top edge is lowered on the front (+Z) and/or back (-Z) face.
///
/// Heights are fractions of the full cube height: `1.0` is a regular cube
/// edge, `0.0` collapses that edge onto the bottom face.
pub fn wedge(front_height: f32, back_height: f32) -> Result<MeshData, MeshError> {
    check_height("front", front_height)?;
    check_height("back", back_height)?;
    Ok(build_wedge(front_height, back_height))
}

fn check_height(face: &'static str, value: f32) -> Result<(), MeshError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MeshError::InvalidHeight { face, value })
    }
}

fn build_wedge(front_height: f32, back_height: f32) -> MeshData {
    let fh = -1.0 + front_height * 2.0;
    let bh = -1.0 + back_height * 2.0;
    let face_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut builder = MeshBuilder::with_capacity(24, 36);

    // Front face (Z+)
    builder.add_flat_quad(
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, fh, 1.0),
            Vec3::new(-1.0, fh, 1.0),
        ],
        face_uvs,
        Vec3::Z,
    );

    // Back face (Z-)
    builder.add_flat_quad(
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, bh, -1.0),
            Vec3::new(1.0, bh, -1.0),
        ],
        face_uvs,
        Vec3::NEG_Z,
    );

    // Left face (X-)
    builder.add_flat_quad(
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, fh, 1.0),
            Vec3::new(-1.0, bh, -1.0),
        ],
        face_uvs,
        Vec3::NEG_X,
    );

    // Right face (X+)
    builder.add_flat_quad(
        [
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, bh, -1.0),
            Vec3::new(1.0, fh, 1.0),
        ],
        face_uvs,
        Vec3::X,
    );

    // Bottom face (Y-)
    builder.add_flat_quad(
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
        face_uvs,
        Vec3::NEG_Y,
    );

    // Top face, sloped when the front and back heights differ
    builder.add_flat_quad(
        [
            Vec3::new(-1.0, fh, 1.0),
            Vec3::new(1.0, fh, 1.0),
            Vec3::new(1.0, bh, -1.0),
            Vec3::new(-1.0, bh, -1.0),
        ],
        face_uvs,
        Vec3::Y,
    );

    builder.finish()
}

/// A closed cylinder of radius 1 along the Z axis, spanning z in [-1, 1].
///
/// The side wall duplicates the seam column so texture coordinates wrap
/// cleanly; each cap has its own centre and rim vertices with flat normals.
pub fn cylinder(slices: u32) -> Result<MeshData, MeshError> {
    check_segments("cylinder", slices)?;

    let columns = slices + 1;
    let mut builder = MeshBuilder::with_capacity(4 * slices as usize + 6, 12 * slices as usize);

    // Side wall: vertex 2i is on the z = -1 ring, 2i + 1 on the z = +1 ring.
    for i in 0..columns {
        let (sin, cos) = ring_angle(i, slices).sin_cos();
        let normal = Vec3::new(cos, sin, 0.0);
        let u = i as f32 / slices as f32;
        builder.add_vertex(Vec3::new(cos, sin, -1.0), normal, Vec2::new(u, 0.0));
        builder.add_vertex(Vec3::new(cos, sin, 1.0), normal, Vec2::new(u, 1.0));
    }
    for i in 0..slices {
        let bottom = 2 * i;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        builder
            .add_triangle(bottom, next_bottom, next_top)
            .add_triangle(bottom, next_top, top);
    }

    add_cylinder_cap(&mut builder, slices, 1.0);
    add_cylinder_cap(&mut builder, slices, -1.0);

    Ok(builder.finish())
}

fn check_segments(shape: &'static str, got: u32) -> Result<(), MeshError> {
    if got < 3 {
        Err(MeshError::TooFewSegments {
            shape,
            min: 3,
            got,
        })
    } else if got > MAX_SEGMENTS {
        Err(MeshError::TooManySegments {
            shape,
            max: MAX_SEGMENTS,
            got,
        })
    } else {
        Ok(())
    }
}

fn ring_angle(i: u32, slices: u32) -> f32 {
    // The seam column closes the ring exactly rather than relying on TAU rounding.
    if i == slices {
        0.0
    } else {
        TAU * i as f32 / slices as f32
    }
}

fn add_cylinder_cap(builder: &mut MeshBuilder, slices: u32, z: f32) {
    let normal = Vec3::new(0.0, 0.0, z.signum());
    let center = builder.add_vertex(Vec3::new(0.0, 0.0, z), normal, Vec2::splat(0.5));

    let first_rim = center + 1;
    for i in 0..=slices {
        let (sin, cos) = ring_angle(i, slices).sin_cos();
        builder.add_vertex(
            Vec3::new(cos, sin, z),
            normal,
            Vec2::new(cos * 0.5 + 0.5, sin * 0.5 + 0.5),
        );
    }

    for i in 0..slices {
        let rim = first_rim + i;
        if z > 0.0 {
            builder.add_triangle(center, rim, rim + 1);
        } else {
            builder.add_triangle(center, rim + 1, rim);
        }
    }
}

/// A UV sphere of radius 1 with `complexity` rings and segments.
///
/// Vertices form a `(complexity + 1)²` grid from the north (+Y) to the south
/// pole. The zero-area triangles that would touch each pole are skipped.
pub fn sphere(complexity: u32) -> Result<MeshData, MeshError> {
    check_segments("sphere", complexity)?;

    let c = complexity;
    let stride = c + 1;
    let (n, s) = (c as usize, stride as usize);
    let mut builder = MeshBuilder::with_capacity(s * s, 6 * n * n - 6 * n);

    for i in 0..=c {
        let (sin_theta, cos_theta) = (PI * i as f32 / c as f32).sin_cos();
        for j in 0..=c {
            let (sin_phi, cos_phi) = ring_angle(j, c).sin_cos();
            let position = Vec3::new(sin_theta * cos_phi, cos_theta, -sin_theta * sin_phi);
            let uv = Vec2::new(j as f32 / c as f32, 1.0 - i as f32 / c as f32);
            builder.add_vertex(position, position, uv);
        }
    }

    let index = |i: u32, j: u32| i * stride + j;
    for i in 0..c {
        for j in 0..c {
            if i != 0 {
                builder.add_triangle(index(i, j), index(i + 1, j), index(i, j + 1));
            }
            if i != c - 1 {
                builder.add_triangle(index(i, j + 1), index(i + 1, j), index(i + 1, j + 1));
            }
        }
    }

    Ok(builder.finish())
}

/// A square pyramid: 1x1 base at y = -0.75, apex at y = 0.75.
pub fn pyramid() -> MeshData {
    let apex = Vec3::new(0.0, 0.75, 0.0);
    let base_y = -0.75;
    // Counter-clockwise when seen from above.
    let corners = [
        Vec3::new(-0.5, base_y, 0.5),
        Vec3::new(0.5, base_y, 0.5),
        Vec3::new(0.5, base_y, -0.5),
        Vec3::new(-0.5, base_y, -0.5),
    ];

    let mut builder = MeshBuilder::with_capacity(16, 18);

    for k in 0..4 {
        let c1 = corners[k];
        let c2 = corners[(k + 1) % 4];
        let mid = (c1 + c2) * 0.5;
        let outward = Vec3::new(mid.x, 0.0, mid.z).normalize_or_zero();
        builder.add_flat_triangle(
            [c1, c2, apex],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
            outward,
        );
    }

    builder.add_flat_quad(
        [corners[3], corners[2], corners[1], corners[0]],
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        Vec3::NEG_Y,
    );

    builder.finish()
}
