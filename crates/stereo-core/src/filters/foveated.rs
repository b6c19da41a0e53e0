//! Gaze-contingent blur in three eccentricity bands.

use glam::{Vec2, Vec4};

use super::FragmentShader;
use crate::constants::*;
use crate::image::{FragCoord, Sampler};
use crate::kernel::BlurKernel;
use crate::state::DisplayParameters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoveationBand {
    Foveal,
    Middle,
    Outer,
}

/// Band for an eccentricity in degrees. Upper bounds are inclusive, so a
/// fragment exactly on `e1` stays foveal and one exactly on `e2` stays middle.
#[inline]
pub fn classify(dist_degree: f32, e1: f32, e2: f32) -> FoveationBand {
    debug_assert!(e1 < e2, "foveation thresholds must satisfy e1 < e2");
    if dist_degree > e2 {
        FoveationBand::Outer
    } else if dist_degree > e1 {
        FoveationBand::Middle
    } else {
        FoveationBand::Foveal
    }
}

/// Visual angle subtended by one pixel, in degrees.
pub fn pixel_visual_angle(display: &DisplayParameters) -> f32 {
    let half = display.pixel_pitch / 2.0;
    (2.0 * (half / display.distance_screen_viewer).atan()).to_degrees()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoveationParams {
    /// Fixation point in window pixels.
    pub gaze_position: Vec2,
    pub e1: f32,
    pub e2: f32,
    /// Degrees per pixel.
    pub pixel_va: f32,
    pub middle_kernel: BlurKernel<MIDDLE_KERNEL_TAPS>,
    pub outer_kernel: BlurKernel<OUTER_KERNEL_TAPS>,
}

impl FoveationParams {
    pub fn new(gaze_position: Vec2, display: &DisplayParameters) -> Self {
        Self {
            gaze_position,
            e1: DEFAULT_FOVEA_E1_DEG,
            e2: DEFAULT_FOVEA_E2_DEG,
            pixel_va: pixel_visual_angle(display),
            middle_kernel: BlurKernel::gaussian(MIDDLE_KERNEL_SIGMA),
            outer_kernel: BlurKernel::gaussian(OUTER_KERNEL_SIGMA),
        }
    }

    #[inline]
    pub fn eccentricity(&self, pixel: Vec2) -> f32 {
        (self.gaze_position - pixel).length() * self.pixel_va
    }

    #[inline]
    pub fn band(&self, pixel: Vec2) -> FoveationBand {
        classify(self.eccentricity(pixel), self.e1, self.e2)
    }
}

pub struct FoveatedPass<'a, C> {
    pub color: &'a C,
    pub params: FoveationParams,
}

impl<'a, C: Sampler<Vec4>> FoveatedPass<'a, C> {
    pub fn new(color: &'a C, params: FoveationParams) -> Self {
        Self { color, params }
    }

    fn convolve<const N: usize>(&self, frag: FragCoord, kernel: &BlurKernel<N>) -> Vec4 {
        let r = kernel.radius() as f32;
        let mut acc = Vec4::ZERO;
        for i in 0..N {
            for j in 0..N {
                let uv = frag.offset_uv(-(i as f32 - r), -(j as f32 - r));
                acc += kernel.weight_2d(i, j) * self.color.sample(uv);
            }
        }
        acc
    }
}

impl<C: Sampler<Vec4>> FragmentShader for FoveatedPass<'_, C> {
    fn shade(&self, frag: FragCoord) -> Vec4 {
        match self.params.band(frag.pixel) {
            FoveationBand::Foveal => self.color.sample(frag.uv),
            FoveationBand::Middle => self.convolve(frag, &self.params.middle_kernel),
            FoveationBand::Outer => self.convolve(frag, &self.params.outer_kernel),
        }
    }
}
