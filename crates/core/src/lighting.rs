//! Phong reflection model shared by the GPU shader and CPU-side checks.
//!
//! Each light contributes ambient, diffuse and specular terms; the sum
//! modulates the surface texel. The WGSL fragment shader implements the same
//! arithmetic.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::light::PointLight;

/// Material-independent specular settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhongParams {
    /// Scale of the specular highlight.
    pub specular_intensity: f32,
    /// Specular exponent; larger values give smaller highlights.
    pub shininess: f32,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            specular_intensity: 0.1,
            shininess: 16.0,
        }
    }
}

/// Surface sample to shade, in world space.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub position: Vec3,
    pub normal: Vec3,
    pub texel: Vec4,
}

/// Lighting contributed by a single light before texture modulation.
pub fn light_contribution(
    light: &PointLight,
    fragment: &Fragment,
    view_position: Vec3,
    params: &PhongParams,
) -> Vec3 {
    let norm = fragment.normal.normalize_or_zero();
    let light_dir = (light.position - fragment.position).normalize_or_zero();

    let ambient = light.ambient_strength * light.color;

    let impact = norm.dot(light_dir).max(0.0);
    let diffuse = impact * light.color;

    let view_dir = (view_position - fragment.position).normalize_or_zero();
    let reflect_dir = reflect(-light_dir, norm);
    let specular_component = view_dir.dot(reflect_dir).max(0.0).powf(params.shininess);
    let specular = params.specular_intensity * specular_component * light.color;

    ambient + diffuse + specular
}

/// Final colour of a fragment lit by `lights`; alpha is always 1.
pub fn shade<'a>(
    lights: impl IntoIterator<Item = &'a PointLight>,
    fragment: &Fragment,
    view_position: Vec3,
    params: &PhongParams,
) -> Vec4 {
    let total: Vec3 = lights
        .into_iter()
        .map(|light| light_contribution(light, fragment, view_position, params))
        .sum();
    (total * fragment.texel.truncate()).extend(1.0)
}

/// Reflect `incident` about `normal` (GLSL/WGSL `reflect`).
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{LightRig, LAMP_COLOR};

    fn white_fragment(position: Vec3, normal: Vec3) -> Fragment {
        Fragment {
            position,
            normal,
            texel: Vec4::ONE,
        }
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_back_facing_light_is_ambient_only() {
        let light = PointLight::new(Vec3::new(0.0, -10.0, 0.0), Vec3::ONE, 0.25);
        let frag = white_fragment(Vec3::ZERO, Vec3::Y);
        let eye = Vec3::new(0.0, 5.0, 5.0);
        let c = light_contribution(&light, &frag, eye, &PhongParams::default());
        assert!((c - Vec3::splat(0.25)).length() < 1e-6);
    }

    #[test]
    fn test_head_on_light_full_terms() {
        // Light, eye and normal all aligned: diffuse = 1, specular = intensity.
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ONE, 0.0);
        let frag = white_fragment(Vec3::ZERO, Vec3::Y);
        let params = PhongParams::default();
        let c = light_contribution(&light, &frag, Vec3::new(0.0, 3.0, 0.0), &params);
        assert!((c - Vec3::splat(1.0 + params.specular_intensity)).length() < 1e-5);
    }

    #[test]
    fn test_shade_modulates_texel() {
        let rig = LightRig::desk_lamps();
        let frag = Fragment {
            position: Vec3::new(0.0, -1.0, 0.0),
            normal: Vec3::Y,
            texel: Vec4::new(0.5, 0.0, 1.0, 0.3),
        };
        let eye = Vec3::new(0.0, 3.0, 18.0);
        let params = PhongParams::default();
        let color = shade(rig.iter(), &frag, eye, &params);
        let white = shade(rig.iter(), &Fragment { texel: Vec4::ONE, ..frag }, eye, &params);
        assert_eq!(color.w, 1.0);
        assert_eq!(color.y, 0.0);
        // Both ambients alone already exceed 1.5x the lamp colour.
        assert!(color.z > 1.5 * LAMP_COLOR.z);
        assert!((color.x - 0.5 * white.x).abs() < 1e-5);
        assert!((color.z - white.z).abs() < 1e-5);
    }

    #[test]
    fn test_unnormalized_normal() {
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ONE, 0.0);
        let eye = Vec3::new(10.0, 0.0, 0.0);
        let params = PhongParams::default();
        let long = white_fragment(Vec3::ZERO, Vec3::Y * 7.0);
        let unit = white_fragment(Vec3::ZERO, Vec3::Y);
        let a = light_contribution(&light, &long, eye, &params);
        let b = light_contribution(&light, &unit, eye, &params);
        assert!((a - b).length() < 1e-6);
    }
}
