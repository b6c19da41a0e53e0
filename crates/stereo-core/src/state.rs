//! Per-frame and per-session state types shared with host frontends.
//!
//! These types intentionally avoid referencing platform-specific APIs. A host
//! controller produces a [`ViewerState`] every frame and loads
//! [`DisplayParameters`] once per session; the core only reads them.

use std::ops::{Index, IndexMut};

use glam::{Vec2, Vec3};

use crate::constants::*;
use crate::error::{Error, Result};

/// Viewer and object pose for one frame. Distances are in millimetres,
/// rotation angles in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    pub viewer_position: Vec3,
    pub viewer_target: Vec3,
    pub model_translation: Vec3,
    /// `x` rotates about the X axis, `y` about the Y axis.
    pub model_rotation: Vec2,
    pub clip_near: f32,
    pub clip_far: f32,
    /// Perspective (true) or orthographic (false) projection in mono mode.
    pub perspective: bool,
    /// Replace the eye-derived camera with a fixed overhead one.
    pub top_view: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            viewer_position: Vec3::from_array(DEFAULT_VIEWER_POSITION),
            viewer_target: Vec3::from_array(DEFAULT_VIEWER_TARGET),
            model_translation: Vec3::ZERO,
            model_rotation: Vec2::ZERO,
            clip_near: DEFAULT_CLIP_NEAR,
            clip_far: DEFAULT_CLIP_FAR,
            perspective: true,
            top_view: false,
        }
    }
}

impl ViewerState {
    pub fn validate(&self) -> Result<()> {
        let (near, far) = (self.clip_near, self.clip_far);
        if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
            return Err(Error::InvalidClipPlanes { near, far });
        }
        Ok(())
    }
}

/// Physical description of the display and optics. Immutable for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayParameters {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// mm per pixel
    pub pixel_pitch: f32,
    pub distance_screen_viewer: f32,
    pub ipd: f32,
    pub lens_magnification: f32,
    pub distance_lens_screen: f32,
    /// Radial distortion coefficients `[K1, K2]`.
    pub lens_k: Vec2,
}

impl Default for DisplayParameters {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            pixel_pitch: DEFAULT_PIXEL_PITCH_MM,
            distance_screen_viewer: DEFAULT_DISTANCE_SCREEN_VIEWER_MM,
            ipd: DEFAULT_IPD_MM,
            lens_magnification: DEFAULT_LENS_MAGNIFICATION,
            distance_lens_screen: DEFAULT_DISTANCE_LENS_SCREEN_MM,
            lens_k: default_lens_k(),
        }
    }
}

impl DisplayParameters {
    /// Physical canvas size in mm.
    pub fn canvas_size_mm(&self) -> Vec2 {
        Vec2::new(
            self.canvas_width as f32 * self.pixel_pitch,
            self.canvas_height as f32 * self.pixel_pitch,
        )
    }

    /// Check every field once at load time. The per-frame math assumes this passed.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width as f32),
            ("canvas_height", self.canvas_height as f32),
            ("pixel_pitch", self.pixel_pitch),
            ("distance_screen_viewer", self.distance_screen_viewer),
            ("ipd", self.ipd),
            ("lens_magnification", self.lens_magnification),
            ("distance_lens_screen", self.distance_lens_screen),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidDisplay { field, value });
            }
        }
        // Both eyes need a non-empty outer half-frustum.
        if self.ipd >= self.canvas_size_mm().x {
            return Err(Error::InvalidDisplay {
                field: "ipd",
                value: self.ipd,
            });
        }
        for (field, value) in [("lens_k1", self.lens_k.x), ("lens_k2", self.lens_k.y)] {
            if !value.is_finite() {
                return Err(Error::InvalidDisplay { field, value });
            }
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus the panel split: stereo eyes each
    /// take exactly half of the canvas columns.
    pub fn validate_for(&self, mode: RenderMode) -> Result<()> {
        self.validate()?;
        if mode == RenderMode::Stereo && self.canvas_width % 2 != 0 {
            return Err(Error::OddStereoWidth(self.canvas_width));
        }
        Ok(())
    }
}

/// Desktop (single view) or head-mounted (per-eye views) rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Mono,
    Stereo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Horizontal view shift realising half the IPD. The left eye's world is
    /// pushed right (+), the right eye's left (-).
    #[inline]
    pub fn half_ipd_shift(self, ipd: f32) -> f32 {
        match self {
            Eye::Left => ipd / 2.0,
            Eye::Right => -ipd / 2.0,
        }
    }
}

/// A value per eye.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoPair<T> {
    pub left: T,
    pub right: T,
}

impl<T> StereoPair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn from_fn(mut f: impl FnMut(Eye) -> T) -> Self {
        Self {
            left: f(Eye::Left),
            right: f(Eye::Right),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> StereoPair<U> {
        StereoPair {
            left: f(self.left),
            right: f(self.right),
        }
    }

    pub fn as_ref(&self) -> StereoPair<&T> {
        StereoPair {
            left: &self.left,
            right: &self.right,
        }
    }
}

impl<T> Index<Eye> for StereoPair<T> {
    type Output = T;

    fn index(&self, eye: Eye) -> &T {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Eye> for StereoPair<T> {
    fn index_mut(&mut self, eye: Eye) -> &mut T {
        match eye {
            Eye::Left => &mut self.left,
            Eye::Right => &mut self.right,
        }
    }
}
