//! Camera-space distance recovery from a normalised depth buffer.
//!
//! Only valid for projections laid out like
//! [`compute_perspective_transform`](crate::transform::compute_perspective_transform):
//! the depth row is `(0, 0, P22, P23)` and the `w` row is `(0, 0, -1, 0)`.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::image::Sampler;
use crate::transform::entry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthReconstructor {
    projection: Mat4,
    inverse: Mat4,
    viewport: Vec2,
}

impl DepthReconstructor {
    pub fn new(projection: Mat4, viewport: Vec2) -> Self {
        Self::with_inverse(projection, projection.inverse(), viewport)
    }

    /// Use a caller-supplied inverse, e.g. one already uploaded next to `projection`.
    pub fn with_inverse(projection: Mat4, inverse: Mat4, viewport: Vec2) -> Self {
        debug_assert!(viewport.x > 0.0 && viewport.y > 0.0);
        Self {
            projection,
            inverse,
            viewport,
        }
    }

    #[inline]
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    #[inline]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Camera-space position of the fragment at `pixel` with depth sample `depth`.
    pub fn camera_point(&self, depth: f32, pixel: Vec2) -> Vec3 {
        let z_ndc = 2.0 * depth - 1.0;
        let xy_ndc = 2.0 * pixel / self.viewport - Vec2::ONE;

        let p22 = entry(&self.projection, 2, 2);
        let p23 = entry(&self.projection, 2, 3);
        let z_cam = -p23 / (z_ndc + p22);
        let w_clip = -z_cam;

        let clip = Vec4::new(xy_ndc.x, xy_ndc.y, z_ndc, 1.0) * w_clip;
        (self.inverse * clip).truncate()
    }

    /// Euclidean distance from the camera to the fragment, in camera units (mm).
    #[inline]
    pub fn distance(&self, depth: f32, pixel: Vec2) -> f32 {
        self.camera_point(depth, pixel).length()
    }

    /// Distance at a pixel position, reading depth from `depth_map`.
    #[inline]
    pub fn distance_at(&self, depth_map: &impl Sampler<f32>, pixel: Vec2) -> f32 {
        let d = depth_map.sample(pixel / self.viewport);
        self.distance(d, pixel)
    }
}

/// Normalised depth-buffer value of a camera-space point under `projection`.
///
/// The forward counterpart of [`DepthReconstructor::camera_point`]; hosts that
/// synthesise depth buffers use it to write window depth.
#[inline]
pub fn window_depth(projection: &Mat4, camera_point: Vec3) -> f32 {
    let clip = *projection * camera_point.extend(1.0);
    let z_ndc = clip.z / clip.w;
    0.5 * z_ndc + 0.5
}
