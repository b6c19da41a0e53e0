//! Red/cyan anaglyph compositing.

use glam::{Vec3, Vec4};

use super::FragmentShader;
use crate::constants::LUMA_WEIGHTS;
use crate::image::{FragCoord, Sampler};

#[inline]
pub fn luminance(color: Vec4) -> f32 {
    color.truncate().dot(Vec3::from_array(LUMA_WEIGHTS))
}

/// Left-eye luminance in red, right-eye luminance in green and blue.
pub struct AnaglyphPass<'a, C> {
    pub left: &'a C,
    pub right: &'a C,
}

impl<'a, C: Sampler<Vec4>> AnaglyphPass<'a, C> {
    pub fn new(left: &'a C, right: &'a C) -> Self {
        Self { left, right }
    }
}

impl<C: Sampler<Vec4>> FragmentShader for AnaglyphPass<'_, C> {
    fn shade(&self, frag: FragCoord) -> Vec4 {
        let l = luminance(self.left.sample(frag.uv));
        let r = luminance(self.right.sample(frag.uv));
        Vec4::new(l, r, r, 1.0)
    }
}
