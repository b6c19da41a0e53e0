//! Retinal depth-of-field blur driven by the circle of confusion.

use glam::{Vec2, Vec4};

use super::FragmentShader;
use crate::constants::{DEFAULT_PUPIL_DIAMETER_MM, DOF_SEARCH_RADIUS_PX, MIN_FRAGMENT_DISTANCE_MM};
use crate::depth::DepthReconstructor;
use crate::image::{FragCoord, Sampler};

/// Circle-of-confusion diameter in mm for an eye accommodated at `focus_dist`.
///
/// Distances below [`MIN_FRAGMENT_DISTANCE_MM`] are clamped so the result stays finite.
#[inline]
pub fn compute_coc(frag_dist: f32, focus_dist: f32, pupil_diameter: f32) -> f32 {
    debug_assert!(frag_dist.is_finite() && focus_dist.is_finite());
    let frag = frag_dist.max(MIN_FRAGMENT_DISTANCE_MM);
    pupil_diameter * (focus_dist - frag).abs() / frag
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DofParams {
    /// Fixation point in window pixels.
    pub gaze_position: Vec2,
    pub pupil_diameter: f32,
    pub pixel_pitch: f32,
}

impl DofParams {
    pub fn new(gaze_position: Vec2, pixel_pitch: f32) -> Self {
        Self {
            gaze_position,
            pupil_diameter: DEFAULT_PUPIL_DIAMETER_MM,
            pixel_pitch,
        }
    }
}

pub struct DofPass<'a, C, D> {
    pub color: &'a C,
    pub depth: &'a D,
    pub reconstructor: DepthReconstructor,
    pub params: DofParams,
    focus_dist: f32,
}

impl<'a, C, D> DofPass<'a, C, D>
where
    C: Sampler<Vec4>,
    D: Sampler<f32>,
{
    pub fn new(
        color: &'a C,
        depth: &'a D,
        reconstructor: DepthReconstructor,
        params: DofParams,
    ) -> Self {
        let focus_dist = reconstructor.distance_at(depth, params.gaze_position);
        Self {
            color,
            depth,
            reconstructor,
            params,
            focus_dist,
        }
    }

    /// Accommodation distance: the scene distance under the gaze point,
    /// sampled once per pass.
    #[inline]
    pub fn focus_distance(&self) -> f32 {
        self.focus_dist
    }

    /// Average of the samples inside the circle of confusion around `frag`.
    pub fn compute_blur(&self, frag: FragCoord, focus_dist: f32) -> Vec4 {
        let frag_dist = self.reconstructor.distance_at(self.depth, frag.pixel);
        let coc = compute_coc(frag_dist, focus_dist, self.params.pupil_diameter);

        let r = DOF_SEARCH_RADIUS_PX;
        let mut sum = Vec4::ZERO;
        let mut count = 0u32;
        for dy in -r..=r {
            for dx in -r..=r {
                let offset = Vec2::new(dx as f32, dy as f32);
                let mm_away = offset.length() * self.params.pixel_pitch;
                if mm_away < coc {
                    sum += self.color.sample(frag.offset_uv(offset.x, offset.y));
                    count += 1;
                }
            }
        }

        let rgb = if count == 0 {
            self.color.sample(frag.uv).truncate()
        } else {
            (sum / count as f32).truncate()
        };
        rgb.extend(1.0)
    }
}

impl<C, D> FragmentShader for DofPass<'_, C, D>
where
    C: Sampler<Vec4>,
    D: Sampler<f32>,
{
    fn shade(&self, frag: FragCoord) -> Vec4 {
        self.compute_blur(frag, self.focus_distance())
    }
}
