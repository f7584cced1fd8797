//! Desk Scene Core - Geometry, Camera and Lighting
//!
//! Everything here is independent of the GPU and the window system so it can
//! be unit tested directly:
//!
//! - `primitives` generates the unit shapes the scene is built from
//! - `camera` is the fly-through camera and its projections
//! - `light` and `lighting` hold the orbiting lamps and the Phong model
//! - `scene` describes which shape goes where with which texture
//! - `input` turns held keys and mouse motion into camera updates

pub mod camera;
pub mod config;
pub mod input;
pub mod light;
pub mod lighting;
pub mod mesh;
pub mod primitives;
pub mod scene;
pub mod transform;

pub use camera::{CameraMovement, FlyCamera, Lens, ProjectionMode};
pub use config::{AppConfig, ConfigError};
pub use input::{CommandOutcome, MoveFlags, PointerButton, ViewCommand, ViewControls};
pub use light::{LightRig, PointLight};
pub use lighting::PhongParams;
pub use mesh::{MeshData, MeshVertex};
pub use primitives::MeshError;
pub use scene::{Primitive, SceneDescription, SceneError, SceneObject};
pub use transform::Transform;
