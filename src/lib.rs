//! Reference host for the stereo viewing core: an analytic test scene, the
//! per-frame post-processing chain and stereo composition.

pub mod camera;
pub mod compose;
pub mod constants;
pub mod frame;
pub mod scene;

pub use compose::{compose, to_rgba8, to_rgba8_bytes, StereoOutput};
pub use frame::{DofSettings, FoveationSettings, FrameOutput, FrameRenderer, PostSettings};
pub use scene::TestScene;
pub use stereo_core;
