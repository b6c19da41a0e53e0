//! Separable blur kernels with compile-time tap counts.

/// Normalised 1D weights, applied along both axes as an outer product.
///
/// `N` must be odd; the centre tap sits at index `N / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurKernel<const N: usize> {
    weights: [f32; N],
}

impl<const N: usize> BlurKernel<N> {
    pub const RADIUS: usize = N / 2;

    /// Build from raw weights, normalising them to sum to 1.
    pub fn from_weights(weights: [f32; N]) -> Self {
        debug_assert!(N % 2 == 1, "kernel needs an odd number of taps");
        let sum: f32 = weights.iter().sum();
        debug_assert!(sum > 0.0, "kernel weights must have a positive sum");
        let mut normalised = weights;
        for w in &mut normalised {
            *w /= sum;
        }
        Self {
            weights: normalised,
        }
    }

    pub fn gaussian(sigma: f32) -> Self {
        debug_assert!(sigma > 0.0);
        let r = Self::RADIUS as f32;
        let denom = 2.0 * sigma * sigma;
        let weights = std::array::from_fn(|i| {
            let x = i as f32 - r;
            (-(x * x) / denom).exp()
        });
        Self::from_weights(weights)
    }

    pub fn box_filter() -> Self {
        Self::from_weights([1.0; N])
    }

    #[inline]
    pub fn weights(&self) -> &[f32; N] {
        &self.weights
    }

    #[inline]
    pub fn radius(&self) -> usize {
        Self::RADIUS
    }

    /// Weight of the 2D outer product at tap `(i, j)`.
    #[inline]
    pub fn weight_2d(&self, i: usize, j: usize) -> f32 {
        self.weights[i] * self.weights[j]
    }
}
