//! Point lights and the orbiting light rig.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Warm white used by both desk lamps.
pub const LAMP_COLOR: Vec3 = Vec3::new(0.639, 0.592, 0.512);

/// Default orbit speed in degrees per second.
pub const DEFAULT_ORBIT_SPEED: f32 = 45.0;

/// Number of lights the shading model supports.
pub const LIGHT_COUNT: usize = 2;

/// A point light with a visible marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    /// Fraction of `color` added everywhere regardless of direction.
    pub ambient_strength: f32,
    /// Uniform scale of the marker sphere drawn at the light position.
    #[serde(default = "default_marker_scale")]
    pub marker_scale: f32,
    /// Axis through the origin the light orbits around.
    #[serde(default = "default_orbit_axis")]
    pub orbit_axis: Vec3,
}

fn default_marker_scale() -> f32 {
    0.3
}

fn default_orbit_axis() -> Vec3 {
    Vec3::Y
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, ambient_strength: f32) -> Self {
        Self {
            position,
            color,
            ambient_strength,
            marker_scale: default_marker_scale(),
            orbit_axis: default_orbit_axis(),
        }
    }

    pub fn with_orbit_axis(mut self, axis: Vec3) -> Self {
        self.orbit_axis = axis;
        self
    }

    /// Rotate the light about its orbit axis through the origin.
    pub fn orbit(&mut self, radians: f32) {
        let axis = self.orbit_axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.position = Quat::from_axis_angle(axis, radians) * self.position;
    }
}

/// The pair of lights illuminating the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub lights: [PointLight; LIGHT_COUNT],
    /// Orbit speed in degrees per second.
    #[serde(default = "default_orbit_speed")]
    pub angular_speed: f32,
    #[serde(default)]
    pub orbiting: bool,
}

fn default_orbit_speed() -> f32 {
    DEFAULT_ORBIT_SPEED
}

impl Default for LightRig {
    fn default() -> Self {
        Self::desk_lamps()
    }
}

impl LightRig {
    /// Key light to the right and fill light to the upper left of the desk.
    pub fn desk_lamps() -> Self {
        Self {
            lights: [
                PointLight::new(Vec3::new(12.0, 2.0, 5.0), LAMP_COLOR, 0.8),
                PointLight::new(Vec3::new(-12.0, 5.0, 5.0), LAMP_COLOR, 0.7)
                    .with_orbit_axis(Vec3::new(1.0, 0.0, 1.0)),
            ],
            angular_speed: DEFAULT_ORBIT_SPEED,
            orbiting: false,
        }
    }

    /// Enable or disable orbiting. Returns true if the state changed.
    pub fn set_orbiting(&mut self, orbiting: bool) -> bool {
        let changed = self.orbiting != orbiting;
        self.orbiting = orbiting;
        changed
    }

    /// Advance the orbit by `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        if !self.orbiting {
            return;
        }
        let radians = self.angular_speed.to_radians() * delta_time;
        for light in &mut self.lights {
            light.orbit(radians);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_lamp_defaults() {
        let rig = LightRig::desk_lamps();
        assert_eq!(rig.lights[0].position, Vec3::new(12.0, 2.0, 5.0));
        assert_eq!(rig.lights[1].position, Vec3::new(-12.0, 5.0, 5.0));
        assert_eq!(rig.lights[0].ambient_strength, 0.8);
        assert_eq!(rig.lights[1].ambient_strength, 0.7);
        assert_eq!(rig.lights[0].marker_scale, 0.3);
        assert!(!rig.orbiting);
    }

    #[test]
    fn test_no_motion_when_not_orbiting() {
        let mut rig = LightRig::desk_lamps();
        let before = rig.clone();
        rig.update(1.0);
        assert_eq!(rig, before);
    }

    #[test]
    fn test_orbit_quarter_turn_about_y() {
        let mut rig = LightRig::desk_lamps();
        assert!(rig.set_orbiting(true));
        assert!(!rig.set_orbiting(true));
        // 45 deg/s for 2 s = 90 degrees about +Y: (12, 2, 5) -> (5, 2, -12)
        rig.update(2.0);
        let p = rig.lights[0].position;
        assert!((p - Vec3::new(5.0, 2.0, -12.0)).length() < 1e-4, "{p:?}");
    }

    #[test]
    fn test_orbit_preserves_radius_and_axis_component() {
        let mut rig = LightRig::desk_lamps();
        rig.set_orbiting(true);
        let axis = Vec3::new(1.0, 0.0, 1.0).normalize();
        let start = rig.lights[1].position;
        for _ in 0..100 {
            rig.update(0.016);
        }
        let end = rig.lights[1].position;
        assert!((end.length() - start.length()).abs() < 1e-3);
        assert!((end.dot(axis) - start.dot(axis)).abs() < 1e-3);
        assert!((end - start).length() > 0.1);
    }

    #[test]
    fn test_zero_axis_does_not_move() {
        let mut light = PointLight::new(Vec3::ONE, LAMP_COLOR, 0.5).with_orbit_axis(Vec3::ZERO);
        light.orbit(1.0);
        assert_eq!(light.position, Vec3::ONE);
    }

    #[test]
    fn test_json_defaults() {
        let light: PointLight = serde_json::from_str(
            r#"{ "position": [1.0, 2.0, 3.0], "color": [1.0, 1.0, 1.0], "ambient_strength": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(light.marker_scale, 0.3);
        assert_eq!(light.orbit_axis, Vec3::Y);
    }
}
