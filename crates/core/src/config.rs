//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config file.
//! Command-line flags are applied on top by the client.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{Lens, ProjectionMode, DEFAULT_SENSITIVITY, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
use crate::light::DEFAULT_ORBIT_SPEED;
use crate::lighting::PhongParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Directory image files are resolved against.
    pub texture_dir: PathBuf,
    /// Optional JSON scene; the built-in desk scene is used when absent.
    pub scene_file: Option<PathBuf>,
    pub projection: ProjectionMode,
    pub camera_position: Vec3,
    pub near: f32,
    pub far: f32,
    /// World units per pixel in orthographic mode.
    pub ortho_scale: f32,
    pub mouse_sensitivity: f32,
    pub movement_speed: f32,
    /// Light orbit speed in degrees per second.
    pub orbit_speed: f32,
    /// Start with the lights orbiting.
    pub orbit: bool,
    pub phong: PhongParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Desk Scene".to_string(),
            width: 800,
            height: 600,
            texture_dir: PathBuf::from("textures"),
            scene_file: None,
            projection: ProjectionMode::Perspective,
            camera_position: Vec3::new(0.0, 3.0, 18.0),
            near: 0.1,
            far: 100.0,
            ortho_scale: 0.01,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            movement_speed: DEFAULT_SPEED,
            orbit_speed: DEFAULT_ORBIT_SPEED,
            orbit: false,
            phong: PhongParams::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.ortho_scale > 0.0 && self.ortho_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "ortho_scale must be positive, got {}",
                self.ortho_scale
            )));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.movement_speed) {
            return Err(ConfigError::Invalid(format!(
                "movement_speed must be within {MIN_SPEED}..={MAX_SPEED}, got {}",
                self.movement_speed
            )));
        }
        if !(self.mouse_sensitivity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "mouse_sensitivity must be positive, got {}",
                self.mouse_sensitivity
            )));
        }
        if !self.orbit_speed.is_finite() {
            return Err(ConfigError::Invalid("orbit_speed must be finite".to_string()));
        }
        if !(self.phong.shininess > 0.0) || self.phong.specular_intensity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "phong parameters out of range: {:?}",
                self.phong
            )));
        }
        Ok(())
    }

    pub fn lens(&self) -> Lens {
        Lens {
            near: self.near,
            far: self.far,
            ortho_scale: self.ortho_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.camera_position, Vec3::new(0.0, 3.0, 18.0));
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "width": 1280,
            "projection": "orthographic",
            "phong": { "specular_intensity": 0.5, "shininess": 32.0 }
        }"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 600);
        assert_eq!(config.projection, ProjectionMode::Orthographic);
        assert_eq!(config.phong.shininess, 32.0);
    }

    #[test]
    fn test_lens() {
        let lens = AppConfig::default().lens();
        assert_eq!(lens, Lens::default());
    }

    #[test]
    fn test_invalid_values() {
        for json in [
            r#"{ "width": 0 }"#,
            r#"{ "near": 0.0 }"#,
            r#"{ "near": 10.0, "far": 5.0 }"#,
            r#"{ "ortho_scale": -1.0 }"#,
            r#"{ "movement_speed": 100.0 }"#,
            r#"{ "mouse_sensitivity": 0.0 }"#,
            r#"{ "phong": { "specular_intensity": 0.1, "shininess": 0.0 } }"#,
        ] {
            assert!(
                matches!(AppConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_infinite_far_plane() {
        let config = AppConfig {
            far: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AppConfig::from_json_str("{ width: }"),
            Err(ConfigError::Json(_))
        ));
    }
}
