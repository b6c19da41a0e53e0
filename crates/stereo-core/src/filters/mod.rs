//! Image-space post-processing passes.
//!
//! Each pass is a fragment function: it reads its inputs through [`Sampler`]s
//! and parameter structs and returns one colour per fragment. [`render_pass`]
//! evaluates a pass over a whole viewport. Fragments never observe each
//! other's output within a pass, so rows are shaded in parallel.

use glam::Vec4;
use rayon::prelude::*;

use crate::image::{ColorImage, FragCoord, Image};

pub mod anaglyph;
pub mod dof;
pub mod foveated;
pub mod unwarp;

pub use anaglyph::{luminance, AnaglyphPass};
pub use dof::{compute_coc, DofParams, DofPass};
pub use foveated::{classify, pixel_visual_angle, FoveatedPass, FoveationBand, FoveationParams};
pub use unwarp::{UnwarpParams, UnwarpPass};

/// A per-fragment program over abstract inputs.
pub trait FragmentShader: Sync {
    fn shade(&self, frag: FragCoord) -> Vec4;
}

/// Shade every fragment of a `width` x `height` viewport.
pub fn render_pass<S: FragmentShader + ?Sized>(shader: &S, width: u32, height: u32) -> ColorImage {
    let w = width as usize;
    let mut texels = vec![Vec4::ZERO; w * height as usize];
    if w > 0 {
        texels
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = shader.shade(FragCoord::new(x as u32, y as u32, width, height));
                }
            });
    }
    Image::from_raw(width, height, texels)
}
