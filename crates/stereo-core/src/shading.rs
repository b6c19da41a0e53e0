//! Phong and Gouraud reflection, evaluated in camera space.
//!
//! These are the lighting functions of the main render pass that produces the
//! colour buffers the post-processing passes consume. Light positions are in
//! world space and moved to camera space with the view matrix.

use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.3),
            diffuse: Vec3::splat(0.6),
            specular: Vec3::splat(0.4),
            shininess: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

/// Constant, linear and quadratic distance attenuation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    #[inline]
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

/// Scene-wide lighting inputs shared by both reflection models.
#[derive(Clone, Debug, PartialEq)]
pub struct LightingParams {
    pub view: Mat4,
    pub lights: Vec<PointLight>,
    pub ambient_light: Vec3,
    pub attenuation: Attenuation,
}

struct LightSample {
    to_light: Vec3,
    color: Vec3,
    attenuation: f32,
}

impl LightingParams {
    fn light_samples(&self, pos_cam: Vec3) -> impl Iterator<Item = LightSample> + '_ {
        self.lights.iter().map(move |light| {
            let light_cam = self.view.transform_point3(light.position);
            let offset = light_cam - pos_cam;
            LightSample {
                to_light: offset.normalize_or_zero(),
                color: light.color,
                attenuation: self.attenuation.factor(offset.length()),
            }
        })
    }

    /// Per-fragment ambient + diffuse + specular reflection.
    pub fn phong(&self, pos_cam: Vec3, normal_cam: Vec3, material: &Material) -> Vec3 {
        let n = normal_cam.normalize_or_zero();
        let to_eye = (-pos_cam).normalize_or_zero();
        let mut color = material.ambient * self.ambient_light;
        for l in self.light_samples(pos_cam) {
            let reflected = reflect(-l.to_light, n);
            let diffuse = n.dot(l.to_light).max(0.0);
            let specular = reflected.dot(to_eye).max(0.0).powf(material.shininess);
            color += l.attenuation
                * (diffuse * material.diffuse * l.color + specular * material.specular * l.color);
        }
        color
    }

    /// Per-vertex ambient + diffuse reflection.
    pub fn gouraud_diffuse(&self, pos_cam: Vec3, normal_cam: Vec3, material: &Material) -> Vec3 {
        let n = normal_cam.normalize_or_zero();
        let mut color = material.ambient * self.ambient_light;
        for l in self.light_samples(pos_cam) {
            color += l.attenuation * n.dot(l.to_light).max(0.0) * material.diffuse * l.color;
        }
        color
    }
}

/// GLSL `reflect`: mirror incident direction `i` about normal `n`.
#[inline]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}
