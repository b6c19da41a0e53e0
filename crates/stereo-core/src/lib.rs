pub mod constants;
pub mod depth;
pub mod error;
pub mod filters;
pub mod frustum;
pub mod image;
pub mod kernel;
pub mod shading;
pub mod state;
pub mod tracking;
pub mod transform;

pub use constants::*;
pub use depth::{window_depth, DepthReconstructor};
pub use error::{Error, Result};
pub use filters::{render_pass, FragmentShader};
pub use frustum::{compute_top_bottom_left_right, desktop_frustum, FrustumBounds};
pub use image::{ColorImage, DepthImage, FragCoord, Image, Sampler};
pub use kernel::BlurKernel;
pub use state::*;
pub use transform::*;
