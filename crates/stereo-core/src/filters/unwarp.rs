//! Pre-distortion for viewing through a radially distorting lens.

use glam::{Vec2, Vec4};

use super::FragmentShader;
use crate::constants::OUT_OF_BOUNDS_COLOR;
use crate::image::{FragCoord, Sampler};
use crate::state::{DisplayParameters, Eye};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnwarpParams {
    /// Lens optical centre in normalised viewport coordinates.
    pub center: Vec2,
    /// Viewport size in mm.
    pub viewport_mm: Vec2,
    /// `[K1, K2]`
    pub k: Vec2,
    pub distance_lens_screen: f32,
}

impl UnwarpParams {
    /// Parameters for one eye's half of a side-by-side HMD panel. The lens
    /// centre sits `ipd / 2` from the panel centre.
    pub fn for_eye(display: &DisplayParameters, eye: Eye) -> Self {
        let panel = display.canvas_size_mm();
        let viewport_mm = Vec2::new(panel.x / 2.0, panel.y);
        let inner = (display.ipd / 2.0) / viewport_mm.x;
        let cx = match eye {
            Eye::Left => 1.0 - inner,
            Eye::Right => inner,
        };
        Self {
            center: Vec2::new(cx, 0.5),
            viewport_mm,
            k: display.lens_k,
            distance_lens_screen: display.distance_lens_screen,
        }
    }

    /// Single lens centred on the whole canvas (desktop / mono viewing).
    pub fn centered(display: &DisplayParameters) -> Self {
        Self {
            center: Vec2::splat(0.5),
            viewport_mm: display.canvas_size_mm(),
            k: display.lens_k,
            distance_lens_screen: display.distance_lens_screen,
        }
    }

    /// Source coordinate whose colour lands at `uv` after the lens distorts it.
    #[inline]
    pub fn distorted_coord(&self, uv: Vec2) -> Vec2 {
        let offset = uv - self.center;
        let r = (offset * self.viewport_mm).length() / self.distance_lens_screen;
        let r2 = r * r;
        let scale = 1.0 + self.k.x * r2 + self.k.y * r2 * r2;
        self.center + offset * scale
    }
}

pub struct UnwarpPass<'a, C> {
    pub color: &'a C,
    pub params: UnwarpParams,
}

impl<'a, C: Sampler<Vec4>> UnwarpPass<'a, C> {
    pub fn new(color: &'a C, params: UnwarpParams) -> Self {
        Self { color, params }
    }
}

impl<C: Sampler<Vec4>> FragmentShader for UnwarpPass<'_, C> {
    fn shade(&self, frag: FragCoord) -> Vec4 {
        let src = self.params.distorted_coord(frag.uv);
        let inside = (0.0..=1.0).contains(&src.x) && (0.0..=1.0).contains(&src.y);
        if !inside {
            return OUT_OF_BOUNDS_COLOR;
        }
        self.color.sample(src)
    }
}
