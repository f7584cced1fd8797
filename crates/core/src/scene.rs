//! Scene description: which primitives are drawn where, with which texture.
//!
//! A scene is plain data. The built-in desk scene is available from
//! [`SceneDescription::desk`]; alternative scenes load from JSON.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::LightRig;
use crate::mesh::MeshData;
use crate::primitives::{self, MeshError, DEFAULT_CYLINDER_SLICES, DEFAULT_SPHERE_COMPLEXITY};
use crate::transform::Transform;

/// Sphere complexity used for the light markers.
pub const LAMP_SPHERE_COMPLEXITY: u32 = 16;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("object '{object}' uses undeclared texture '{texture}'")]
    UnknownTexture { object: String, texture: String },

    #[error("object '{object}' has non-positive uv scale {uv_scale}")]
    InvalidUvScale { object: String, uv_scale: f32 },

    #[error("object '{object}' has degenerate scale {scale}")]
    InvalidScale { object: String, scale: Vec3 },

    #[error("object '{object}': {source}")]
    Mesh {
        object: String,
        #[source]
        source: MeshError,
    },
}

/// A parametric shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Plane,
    Cube,
    Wedge { front_height: f32, back_height: f32 },
    Cylinder {
        #[serde(default = "default_slices")]
        slices: u32,
    },
    Sphere {
        #[serde(default = "default_complexity")]
        complexity: u32,
    },
    Pyramid,
}

fn default_slices() -> u32 {
    DEFAULT_CYLINDER_SLICES
}

fn default_complexity() -> u32 {
    DEFAULT_SPHERE_COMPLEXITY
}

impl Primitive {
    pub fn build(&self) -> Result<MeshData, MeshError> {
        match *self {
            Primitive::Plane => Ok(primitives::plane()),
            Primitive::Cube => Ok(primitives::cube()),
            Primitive::Wedge {
                front_height,
                back_height,
            } => primitives::wedge(front_height, back_height),
            Primitive::Cylinder { slices } => primitives::cylinder(slices),
            Primitive::Sphere { complexity } => primitives::sphere(complexity),
            Primitive::Pyramid => Ok(primitives::pyramid()),
        }
    }

    /// Cache key; equal primitives produce equal keys.
    pub fn key(&self) -> String {
        match *self {
            Primitive::Plane => "plane".to_string(),
            Primitive::Cube => "cube".to_string(),
            Primitive::Wedge {
                front_height,
                back_height,
            } => format!("wedge:{:08x}:{:08x}", front_height.to_bits(), back_height.to_bits()),
            Primitive::Cylinder { slices } => format!("cylinder:{slices}"),
            Primitive::Sphere { complexity } => format!("sphere:{complexity}"),
            Primitive::Pyramid => "pyramid".to_string(),
        }
    }

    /// The marker sphere drawn at each light.
    pub const fn lamp_marker() -> Self {
        Primitive::Sphere {
            complexity: LAMP_SPHERE_COMPLEXITY,
        }
    }
}

/// Where an object sits: per-axis scale, Euler rotation in degrees, translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
    pub translation: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation_degrees: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

impl Placement {
    pub fn new(scale: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            translation,
            ..Default::default()
        }
    }

    pub fn rotated(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::from_euler_degrees(self.scale, self.rotation_degrees, self.translation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub primitive: Primitive,
    /// Key into [`SceneDescription::textures`].
    pub texture: String,
    /// Texture coordinate multiplier; values above 1 tile the texture.
    #[serde(default = "default_uv_scale")]
    pub uv_scale: f32,
    #[serde(default)]
    pub placement: Placement,
}

fn default_uv_scale() -> f32 {
    1.0
}

impl SceneObject {
    pub fn new(name: &str, primitive: Primitive, texture: &str, placement: Placement) -> Self {
        Self {
            name: name.to_string(),
            primitive,
            texture: texture.to_string(),
            uv_scale: default_uv_scale(),
            placement,
        }
    }

    pub fn with_uv_scale(mut self, uv_scale: f32) -> Self {
        self.uv_scale = uv_scale;
        self
    }

    pub fn transform(&self) -> Transform {
        self.placement.transform()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub objects: Vec<SceneObject>,
    /// Texture name to image file, relative to the texture directory.
    pub textures: BTreeMap<String, String>,
    #[serde(default)]
    pub lights: LightRig,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 3],
}

fn default_clear_color() -> [f32; 3] {
    [0.412, 0.412, 0.412]
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self::desk()
    }
}

impl SceneDescription {
    /// The desk with speaker, mouse pad, infinity cube, whiteboard and keyboard.
    pub fn desk() -> Self {
        let textures = [
            ("desk", "desk.png"),
            ("mesh_fabric", "black_mesh.png"),
            ("rubber", "black_rubber.png"),
            ("mouse_pad", "mouse_pad.png"),
            ("infinity_cube", "infinity_cube.png"),
        ]
        .into_iter()
        .map(|(name, file)| (name.to_string(), file.to_string()))
        .collect();

        let slope = Primitive::Wedge {
            front_height: 0.4,
            back_height: 1.0,
        };

        let objects = vec![
            SceneObject::new(
                "desk",
                Primitive::Plane,
                "desk",
                Placement::new(Vec3::new(10.0, 1.0, 4.0), Vec3::new(0.0, -1.0, 0.0)),
            ),
            SceneObject::new(
                "speaker",
                Primitive::Sphere {
                    complexity: DEFAULT_SPHERE_COMPLEXITY,
                },
                "mesh_fabric",
                Placement::new(Vec3::splat(0.75), Vec3::new(6.5, -0.25, -2.0)),
            )
            .with_uv_scale(15.0),
            SceneObject::new(
                "speaker base",
                Primitive::Cylinder {
                    slices: DEFAULT_CYLINDER_SLICES,
                },
                "rubber",
                Placement::new(Vec3::new(0.5, 0.25, 0.5), Vec3::new(6.5, -0.4999, -2.0))
                    .rotated(Vec3::new(90.0, 0.0, 0.0)),
            ),
            SceneObject::new(
                "mouse pad",
                Primitive::Plane,
                "mouse_pad",
                // Mirrored in z: the image faces the viewer and the normal stays up.
                Placement::new(Vec3::new(2.25, 1.0, -2.0), Vec3::new(6.0, -0.999, 1.9)),
            ),
            SceneObject::new(
                "infinity cube",
                Primitive::Cube,
                "infinity_cube",
                Placement::new(Vec3::splat(0.375), Vec3::new(-6.0, -0.6249, -1.0))
                    .rotated(Vec3::new(0.0, 25.0, 0.0)),
            ),
            SceneObject::new(
                "whiteboard",
                slope,
                "infinity_cube",
                Placement::new(Vec3::new(4.5, 0.625, 1.5), Vec3::new(0.0, -0.3749, -2.0)),
            ),
            SceneObject::new(
                "keyboard",
                slope,
                "infinity_cube",
                Placement::new(Vec3::new(4.125, 0.125, 1.125), Vec3::new(-0.75, -0.8749, 2.0)),
            ),
        ];

        Self {
            objects,
            textures,
            lights: LightRig::desk_lamps(),
            clear_color: default_clear_color(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded scene from {} ({} objects, {} textures)",
            path.display(),
            scene.objects.len(),
            scene.textures.len()
        );
        Ok(scene)
    }

    /// Check texture references, scales and primitive parameters.
    pub fn validate(&self) -> Result<(), SceneError> {
        for object in &self.objects {
            if !self.textures.contains_key(&object.texture) {
                return Err(SceneError::UnknownTexture {
                    object: object.name.clone(),
                    texture: object.texture.clone(),
                });
            }
            if !(object.uv_scale > 0.0) {
                return Err(SceneError::InvalidUvScale {
                    object: object.name.clone(),
                    uv_scale: object.uv_scale,
                });
            }
            let scale = object.placement.scale;
            if !scale.is_finite() || scale.abs().min_element() == 0.0 {
                return Err(SceneError::InvalidScale {
                    object: object.name.clone(),
                    scale,
                });
            }
            object.primitive.build().map_err(|source| SceneError::Mesh {
                object: object.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Distinct primitives in first-use order, followed by the lamp marker.
    pub fn unique_primitives(&self) -> Vec<Primitive> {
        let mut seen = Vec::<String>::new();
        let mut unique = Vec::new();
        let all = self
            .objects
            .iter()
            .map(|o| o.primitive)
            .chain(std::iter::once(Primitive::lamp_marker()));
        for primitive in all {
            let key = primitive.key();
            if !seen.contains(&key) {
                seen.push(key);
                unique.push(primitive);
            }
        }
        unique
    }

    pub fn clear_color(&self) -> Vec3 {
        Vec3::from_array(self.clear_color)
    }
}
