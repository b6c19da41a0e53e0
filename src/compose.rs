use glam::Vec4;
use stereo_core::filters::AnaglyphPass;
use stereo_core::{render_pass, ColorImage, Error, Image, StereoPair};

/// How two eye images become one display image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StereoOutput {
    /// Left eye in the left half, right eye in the right half (HMD panel).
    #[default]
    SideBySide,
    /// Red/cyan composite at eye resolution.
    Anaglyph,
}

fn ensure_same_size(eyes: &StereoPair<ColorImage>) -> Result<(u32, u32), Error> {
    let dims = eyes.left.dimensions();
    eyes.right.ensure_dimensions(dims)?;
    Ok(dims)
}

pub fn side_by_side(eyes: &StereoPair<ColorImage>) -> Result<ColorImage, Error> {
    let (w, h) = ensure_same_size(eyes)?;
    Ok(Image::from_fn(w * 2, h, |x, y| {
        if x < w {
            eyes.left.get(x, y)
        } else {
            eyes.right.get(x - w, y)
        }
    }))
}

pub fn anaglyph(eyes: &StereoPair<ColorImage>) -> Result<ColorImage, Error> {
    let (w, h) = ensure_same_size(eyes)?;
    Ok(render_pass(&AnaglyphPass::new(&eyes.left, &eyes.right), w, h))
}

pub fn compose(eyes: &StereoPair<ColorImage>, output: StereoOutput) -> Result<ColorImage, Error> {
    match output {
        StereoOutput::SideBySide => side_by_side(eyes),
        StereoOutput::Anaglyph => anaglyph(eyes),
    }
}

/// Quantise a linear colour to 8-bit RGBA, clamping to the displayable range.
#[inline]
pub fn to_rgba8(c: Vec4) -> [u8; 4] {
    c.clamp(Vec4::ZERO, Vec4::ONE)
        .to_array()
        .map(|v| (v * 255.0).round() as u8)
}

/// Tightly packed RGBA8 bytes, top row first. Images store the bottom row
/// first, so rows are flipped here.
pub fn to_rgba8_bytes(image: &ColorImage) -> Vec<u8> {
    let (w, h) = image.dimensions();
    let pixels: Vec<[u8; 4]> = (0..h)
        .rev()
        .flat_map(|y| (0..w).map(move |x| to_rgba8(image.get(x, y))))
        .collect();
    bytemuck::cast_slice(&pixels).to_vec()
}
