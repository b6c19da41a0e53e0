//! Frustum bounds derived from physical display geometry.

use crate::state::{DisplayParameters, StereoPair};

/// Six planes of a (possibly off-axis) viewing volume, in camera-space mm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
}

impl FrustumBounds {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let b = Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
        };
        b.debug_check();
        b
    }

    /// Symmetric bounds from half extents.
    pub fn symmetric(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Self::new(-half_width, half_width, half_height, -half_height, near, far)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        (self.left + self.right).abs() <= f32::EPSILON * self.width().abs()
            && (self.top + self.bottom).abs() <= f32::EPSILON * self.height().abs()
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.left < self.right, "frustum left >= right: {self:?}");
        debug_assert!(self.bottom < self.top, "frustum bottom >= top: {self:?}");
        debug_assert!(
            0.0 < self.near && self.near < self.far,
            "frustum needs 0 < near < far: {self:?}"
        );
    }
}

/// Per-eye asymmetric frustums for a near-eye display.
///
/// Each eye sees half the panel through a magnifying lens. The inner half of
/// the eye's frustum spans `ipd / 2` of the panel and the outer half spans
/// `(panel_width - ipd) / 2`; both are magnified, then projected onto the near
/// plane by similar triangles with the virtual screen distance.
pub fn compute_top_bottom_left_right(
    clip_near: f32,
    clip_far: f32,
    display: &DisplayParameters,
) -> StereoPair<FrustumBounds> {
    let mag = display.lens_magnification;
    let panel = display.canvas_size_mm();
    let h = panel.y * mag;
    let w_inner = mag * display.ipd / 2.0;
    let w_outer = mag * (panel.x - display.ipd) / 2.0;
    let s = clip_near / display.distance_screen_viewer;

    let top = s * h / 2.0;
    let bottom = -top;

    let left_eye = FrustumBounds::new(-s * w_outer, s * w_inner, top, bottom, clip_near, clip_far);
    let right_eye = FrustumBounds::new(-s * w_inner, s * w_outer, top, bottom, clip_near, clip_far);

    StereoPair::new(left_eye, right_eye)
}

/// Symmetric desktop frustum covering the whole canvas.
///
/// Perspective bounds are the physical half extents projected onto the near
/// plane; orthographic bounds are the physical half extents themselves.
pub fn desktop_frustum(
    clip_near: f32,
    clip_far: f32,
    display: &DisplayParameters,
    perspective: bool,
) -> FrustumBounds {
    let half = display.canvas_size_mm() / 2.0;
    let scale = if perspective {
        clip_near / display.distance_screen_viewer
    } else {
        1.0
    };
    FrustumBounds::symmetric(half.x * scale, half.y * scale, clip_near, clip_far)
}
