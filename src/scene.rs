//! Analytic stand-in for the host rasteriser.
//!
//! Ray-casts a few spheres over a checkered floor through an eye's matrices
//! and writes colour and window depth exactly as a rasteriser using the same
//! projection would, so the post-processing chain can run without a GPU.

use anyhow::Context;
use glam::{Mat4, Vec2, Vec3, Vec4};
use rayon::prelude::*;
use stereo_core::shading::{Attenuation, LightingParams, Material, PointLight};
use stereo_core::{window_depth, ColorImage, DepthImage, EyeMatrices, Image};

use crate::camera::{pixel_to_world_ray, ray_plane, ray_sphere};
use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Object-space centre; placed in the world by the model matrix.
    pub center: Vec3,
    pub radius: f32,
    pub color: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Floor {
    pub height: f32,
    pub tile: f32,
    pub colors: [Vec3; 2],
}

impl Floor {
    fn color_at(&self, p: Vec3) -> Vec3 {
        let cell = (p.x / self.tile).floor() as i64 + (p.z / self.tile).floor() as i64;
        self.colors[cell.rem_euclid(2) as usize]
    }
}

#[derive(Clone, Debug)]
pub struct TestScene {
    pub spheres: Vec<Sphere>,
    pub floor: Option<Floor>,
    pub lights: Vec<PointLight>,
    pub ambient_light: Vec3,
    pub background: Vec4,
}

impl Default for TestScene {
    fn default() -> Self {
        let spheres = (0..SPHERE_CENTERS.len())
            .map(|i| Sphere {
                center: Vec3::from_array(SPHERE_CENTERS[i]),
                radius: SPHERE_RADII[i],
                color: Vec3::from_array(SPHERE_COLORS[i]),
            })
            .collect();
        Self {
            spheres,
            floor: Some(Floor {
                height: FLOOR_HEIGHT,
                tile: FLOOR_TILE_MM,
                colors: FLOOR_COLORS.map(Vec3::from_array),
            }),
            lights: vec![PointLight {
                position: Vec3::from_array(LIGHT_POSITION),
                color: Vec3::from_array(LIGHT_COLOR),
            }],
            ambient_light: Vec3::from_array(AMBIENT_LIGHT),
            background: Vec4::from_array(BACKGROUND),
        }
    }
}

struct Hit {
    t: f32,
    normal: Vec3,
    color: Vec3,
}

impl TestScene {
    fn trace(&self, model: &Mat4, origin: Vec3, dir: Vec3) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        let mut consider = |hit: Hit| {
            if best.as_ref().map_or(true, |b| hit.t < b.t) {
                best = Some(hit);
            }
        };

        for s in &self.spheres {
            // Rigid model matrix: radius is unchanged.
            let center = model.transform_point3(s.center);
            if let Some(t) = ray_sphere(origin, dir, center, s.radius) {
                let p = origin + dir * t;
                consider(Hit {
                    t,
                    normal: (p - center).normalize(),
                    color: s.color,
                });
            }
        }
        if let Some(floor) = &self.floor {
            if let Some(t) = ray_plane(origin, dir, Vec3::Y, floor.height) {
                consider(Hit {
                    t,
                    normal: Vec3::Y,
                    color: floor.color_at(origin + dir * t),
                });
            }
        }
        best
    }

    /// Colour and depth buffers for one eye at `width` x `height`.
    pub fn render_eye(
        &self,
        model: &Mat4,
        eye: &EyeMatrices,
        width: u32,
        height: u32,
    ) -> anyhow::Result<(ColorImage, DepthImage)> {
        let view_proj = eye.view_projection();
        let viewport = Vec2::new(width as f32, height as f32);
        let lighting = LightingParams {
            view: eye.view,
            lights: self.lights.clone(),
            ambient_light: self.ambient_light,
            attenuation: Attenuation::default(),
        };

        let (colors, depths): (Vec<Vec4>, Vec<f32>) = (0..width as usize * height as usize)
            .into_par_iter()
            .map(|i| {
                let x = (i % width as usize) as f32;
                let y = (i / width as usize) as f32;
                let pixel = Vec2::new(x + 0.5, y + 0.5);
                let (origin, dir) = pixel_to_world_ray(&view_proj, pixel, viewport);
                match self.trace(model, origin, dir) {
                    Some(hit) => {
                        let p_cam = eye.view.transform_point3(origin + dir * hit.t);
                        let n_cam = eye.view.transform_vector3(hit.normal);
                        let material = Material {
                            ambient: hit.color,
                            diffuse: hit.color,
                            ..Material::default()
                        };
                        let rgb = lighting.phong(p_cam, n_cam, &material);
                        let depth = window_depth(&eye.projection, p_cam).clamp(0.0, 1.0);
                        (rgb.extend(1.0), depth)
                    }
                    None => (self.background, BACKGROUND_DEPTH),
                }
            })
            .unzip();

        let color = Image::from_texels(width, height, colors).context("colour buffer")?;
        let depth = Image::from_texels(width, height, depths).context("depth buffer")?;
        Ok((color, depth))
    }
}
