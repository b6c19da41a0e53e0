//! Images, sampling and fragment coordinates for the post-processing passes.

use glam::{UVec2, Vec2, Vec4};

use crate::error::{Error, Result};

/// Row-major 2D buffer. Row 0 is the bottom row, matching texture space where
/// `v = 0` is the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    width: u32,
    height: u32,
    texels: Vec<T>,
}

/// Linear RGBA colour buffer.
pub type ColorImage = Image<Vec4>;
/// Normalised depth buffer, values in [0, 1].
pub type DepthImage = Image<f32>;

impl<T: Copy> Image<T> {
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            texels: vec![value; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn from_texels(width: u32, height: u32, texels: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Caller guarantees `texels.len() == width * height`.
    pub(crate) fn from_raw(width: u32, height: u32, texels: Vec<T>) -> Self {
        debug_assert_eq!(texels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            texels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn texels(&self) -> &[T] {
        &self.texels
    }

    #[inline]
    pub fn into_texels(self) -> Vec<T> {
        self.texels
    }

    /// Texel at integer coordinates. Panics when out of range.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let w = self.width as usize;
        self.texels[y as usize * w + x as usize] = value;
    }

    /// Texel with clamp-to-edge addressing.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> T {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy)
    }

    pub fn ensure_dimensions(&self, expected: (u32, u32)) -> Result<()> {
        if self.dimensions() != expected {
            return Err(Error::ImageSizeMismatch {
                expected,
                actual: self.dimensions(),
            });
        }
        Ok(())
    }
}

/// Read access to a 2D texture by normalised coordinate.
///
/// Implementations use nearest filtering with clamp-to-edge addressing. Any
/// domain policy other than clamping (e.g. black outside a lens) belongs to the
/// pass, not the sampler.
pub trait Sampler<T>: Sync {
    fn size(&self) -> UVec2;
    fn sample(&self, uv: Vec2) -> T;
}

impl<T: Copy + Send + Sync> Sampler<T> for Image<T> {
    #[inline]
    fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    fn sample(&self, uv: Vec2) -> T {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.get_clamped(x, y)
    }
}

/// Position of the fragment being shaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragCoord {
    /// Pixel centre in window coordinates, e.g. `(0.5, 0.5)` for the first texel.
    pub pixel: Vec2,
    /// Normalised texture coordinate in [0, 1]^2.
    pub uv: Vec2,
    /// Viewport size in pixels.
    pub size: Vec2,
}

impl FragCoord {
    #[inline]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        let size = Vec2::new(width as f32, height as f32);
        let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        Self {
            pixel,
            uv: pixel / size,
            size,
        }
    }

    /// Texture coordinate of the texel offset by `(dx, dy)` pixels.
    #[inline]
    pub fn offset_uv(&self, dx: f32, dy: f32) -> Vec2 {
        self.uv + Vec2::new(dx, dy) / self.size
    }
}
