//! Model, view and projection matrices.
//!
//! Conventions: column vectors, `A * B` applies `B` first, camera looks down
//! -Z, clip-space depth spans [-1, 1]. Entry `(row, col)` of a [`Mat4`] is
//! `m.col(col)[row]`; see [`entry`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::constants::{TOP_VIEW_CLIP_FAR, TOP_VIEW_CLIP_NEAR, TOP_VIEW_MATRIX};
use crate::frustum::{self, FrustumBounds};
use crate::state::{DisplayParameters, Eye, RenderMode, StereoPair, ViewerState};

const WORLD_UP: Vec3 = Vec3::Y;

/// Read entry `(row, col)` of a column-major matrix.
#[inline]
pub fn entry(m: &Mat4, row: usize, col: usize) -> f32 {
    m.col(col)[row]
}

/// True for projections with a perspective divide (bottom row `(0, 0, -1, 0)`).
#[inline]
pub fn is_perspective(m: &Mat4) -> bool {
    entry(m, 3, 3) == 0.0
}

#[inline]
fn from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// `M = T * Rx * Ry`: rotate about the object's Y axis, then X, then place it.
pub fn compute_model_transform(state: &ViewerState) -> Mat4 {
    let translation = Mat4::from_translation(state.model_translation);
    let rot_x = Mat4::from_rotation_x(state.model_rotation.x.to_radians());
    let rot_y = Mat4::from_rotation_y(state.model_rotation.y.to_radians());
    translation * rot_x * rot_y
}

/// World-to-camera matrix built from an explicit orthonormal basis.
///
/// `eye_shift` translates the result along the camera's right axis, which is
/// how each eye of a stereo pair is offset by half the IPD. The caller must
/// keep the eye away from the target and off the world-up line through it.
pub fn compute_view_transform(state: &ViewerState, eye_shift: f32) -> Mat4 {
    let eye = state.viewer_position;
    let to_eye = eye - state.viewer_target;
    debug_assert!(to_eye.length_squared() > 0.0, "viewer position equals target");

    let forward = to_eye.normalize();
    let right = WORLD_UP.cross(forward).normalize();
    let up = forward.cross(right).normalize();
    debug_assert!(right.is_finite(), "view direction parallel to world up");

    // Rows {right, up, forward}
    let rotation = Mat4::from_mat3(Mat3::from_cols(right, up, forward).transpose());
    let translation = Mat4::from_translation(-eye);
    let ipd_shift = Mat4::from_translation(Vec3::new(eye_shift, 0.0, 0.0));

    ipd_shift * rotation * translation
}

/// Off-axis perspective projection (symmetric frustums are the special case).
pub fn compute_perspective_transform(
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    clip_near: f32,
    clip_far: f32,
) -> Mat4 {
    let (n, f) = (clip_near, clip_far);
    let w = right - left;
    let h = top - bottom;
    let d = f - n;
    from_rows([
        [2.0 * n / w, 0.0, (right + left) / w, 0.0],
        [0.0, 2.0 * n / h, (top + bottom) / h, 0.0],
        [0.0, 0.0, -(f + n) / d, -2.0 * f * n / d],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// Parallel projection with linear depth, near -> -1 and far -> +1.
pub fn compute_orthographic_transform(
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    clip_near: f32,
    clip_far: f32,
) -> Mat4 {
    let (n, f) = (clip_near, clip_far);
    let w = right - left;
    let h = top - bottom;
    let d = f - n;
    from_rows([
        [2.0 / w, 0.0, 0.0, -(right + left) / w],
        [0.0, 2.0 / h, 0.0, -(top + bottom) / h],
        [0.0, 0.0, -2.0 / d, -(f + n) / d],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[inline]
pub fn perspective_from_bounds(b: &FrustumBounds) -> Mat4 {
    compute_perspective_transform(b.left, b.right, b.top, b.bottom, b.near, b.far)
}

#[inline]
pub fn orthographic_from_bounds(b: &FrustumBounds) -> Mat4 {
    compute_orthographic_transform(b.left, b.right, b.top, b.bottom, b.near, b.far)
}

/// View and projection for one eye (or the single desktop view).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl EyeMatrices {
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EyeViews {
    Mono(EyeMatrices),
    Stereo(StereoPair<EyeMatrices>),
}

/// Matrices for one frame. Recomputed from scratch by [`update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MvpSet {
    pub model: Mat4,
    pub views: EyeViews,
}

impl MvpSet {
    /// Matrices for `eye`; in mono mode both eyes share the single view.
    pub fn eye(&self, eye: Eye) -> &EyeMatrices {
        match &self.views {
            EyeViews::Mono(m) => m,
            EyeViews::Stereo(pair) => &pair[eye],
        }
    }

    pub fn is_stereo(&self) -> bool {
        matches!(self.views, EyeViews::Stereo(_))
    }

    pub fn uniforms(&self, eye: Eye) -> MvpUniforms {
        let m = self.eye(eye);
        MvpUniforms {
            model: self.model.to_cols_array_2d(),
            view: m.view.to_cols_array_2d(),
            projection: m.projection.to_cols_array_2d(),
            model_view: (m.view * self.model).to_cols_array_2d(),
        }
    }
}

/// Column-major matrix block for hosts that upload matrices to GPU buffers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MvpUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

/// Overhead view sized to the viewport it renders into: the whole canvas in
/// mono, one half of the panel per eye in stereo.
fn top_view_matrices(display: &DisplayParameters, mode: RenderMode) -> EyeMatrices {
    let canvas = frustum::desktop_frustum(TOP_VIEW_CLIP_NEAR, TOP_VIEW_CLIP_FAR, display, true);
    let bounds = match mode {
        RenderMode::Mono => canvas,
        RenderMode::Stereo => {
            FrustumBounds::symmetric(canvas.right / 2.0, canvas.top, canvas.near, canvas.far)
        }
    };
    EyeMatrices {
        view: TOP_VIEW_MATRIX,
        projection: perspective_from_bounds(&bounds),
    }
}

/// Compute the full matrix set for this frame.
pub fn update(state: &ViewerState, display: &DisplayParameters, mode: RenderMode) -> MvpSet {
    let model = compute_model_transform(state);
    let (near, far) = (state.clip_near, state.clip_far);

    let views = if state.top_view {
        let top = top_view_matrices(display, mode);
        match mode {
            RenderMode::Mono => EyeViews::Mono(top),
            RenderMode::Stereo => EyeViews::Stereo(StereoPair::new(top, top)),
        }
    } else {
        match mode {
            RenderMode::Mono => {
                let bounds = frustum::desktop_frustum(near, far, display, state.perspective);
                let projection = if state.perspective {
                    perspective_from_bounds(&bounds)
                } else {
                    orthographic_from_bounds(&bounds)
                };
                EyeViews::Mono(EyeMatrices {
                    view: compute_view_transform(state, 0.0),
                    projection,
                })
            }
            RenderMode::Stereo => {
                let bounds = frustum::compute_top_bottom_left_right(near, far, display);
                EyeViews::Stereo(StereoPair::from_fn(|eye| EyeMatrices {
                    view: compute_view_transform(state, eye.half_ipd_shift(display.ipd)),
                    projection: perspective_from_bounds(&bounds[eye]),
                }))
            }
        }
    };

    log::trace!(
        "[mvp] mode={:?} top_view={} near={} far={}",
        mode,
        state.top_view,
        near,
        far
    );
    MvpSet { model, views }
}
