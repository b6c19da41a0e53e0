use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use stereo_core::ViewerState;

/// Compute a world-space ray through a pixel of a viewport.
///
/// - `view_proj`: projection * view of the eye being traced
/// - `pixel`: window coordinates with the origin at the bottom-left
/// - `viewport`: viewport size in pixels
///
/// Works for perspective and orthographic projections since both ray ends are
/// unprojected. Returns `(ray_origin, ray_direction)` in world space, the
/// origin lying on the near plane.
pub fn pixel_to_world_ray(view_proj: &Mat4, pixel: Vec2, viewport: Vec2) -> (Vec3, Vec3) {
    let ndc = 2.0 * pixel / viewport - Vec2::ONE;
    let inv = view_proj.inverse();
    let p_near = inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
    let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let p0: Vec3 = p_near.truncate() / p_near.w;
    let p1: Vec3 = p_far.truncate() / p_far.w;
    (p0, (p1 - p0).normalize())
}

/// Ray / sphere intersection; returns the nearest non-negative hit distance.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Ray / plane intersection for a plane `dot(n, p) = d` facing the ray.
#[inline]
pub fn ray_plane(ray_origin: Vec3, ray_dir: Vec3, normal: Vec3, d: f32) -> Option<f32> {
    let denom = normal.dot(ray_dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (d - normal.dot(ray_origin)) / denom;
    (t >= 0.0).then_some(t)
}

/// Turn the viewer's head: rotate the look direction about the viewer position.
///
/// `orientation` comes from the IMU tracker (`DQuat`, narrowed to `f32`).
pub fn apply_head_orientation(state: &ViewerState, orientation: Quat) -> ViewerState {
    let forward = state.viewer_target - state.viewer_position;
    ViewerState {
        viewer_target: state.viewer_position + orientation * forward,
        ..state.clone()
    }
}
