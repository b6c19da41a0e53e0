use glam::{Mat4, Vec2, Vec4};

// Shared optical/perceptual tuning constants used by the core and the host frontends.

// Display defaults (desktop panel viewed at arm's length)
pub const DEFAULT_CANVAS_WIDTH: u32 = 1920;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1080;
pub const DEFAULT_PIXEL_PITCH_MM: f32 = 0.25;
pub const DEFAULT_DISTANCE_SCREEN_VIEWER_MM: f32 = 600.0;
pub const DEFAULT_IPD_MM: f32 = 63.0; // average adult interpupillary distance
pub const DEFAULT_LENS_MAGNIFICATION: f32 = 1.0;

// HMD lens defaults
pub const DEFAULT_DISTANCE_LENS_SCREEN_MM: f32 = 39.3;
pub const DEFAULT_LENS_K: [f32; 2] = [0.34, 0.55]; // [K1, K2]

// Clip planes (mm)
pub const DEFAULT_CLIP_NEAR: f32 = 1.0;
pub const DEFAULT_CLIP_FAR: f32 = 10000.0;

// Viewer defaults (mm, world space)
pub const DEFAULT_VIEWER_POSITION: [f32; 3] = [0.0, 0.0, 800.0];
pub const DEFAULT_VIEWER_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

// Fixed overhead camera used when the top view override is enabled.
// Rows: (1,0,0,0) (0,0,-1,0) (0,1,0,-1500) (0,0,0,1)
pub const TOP_VIEW_MATRIX: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, -1500.0, 1.0),
);
pub const TOP_VIEW_CLIP_NEAR: f32 = 1.0;
pub const TOP_VIEW_CLIP_FAR: f32 = 10000.0;

// Depth of field
pub const DEFAULT_PUPIL_DIAMETER_MM: f32 = 3.0;
pub const DOF_SEARCH_RADIUS_PX: i32 = 5; // 11x11 window
pub const MIN_FRAGMENT_DISTANCE_MM: f32 = 1e-3; // keeps CoC finite near the eye

// Foveation (eccentricity thresholds in degrees)
pub const DEFAULT_FOVEA_E1_DEG: f32 = 5.0;
pub const DEFAULT_FOVEA_E2_DEG: f32 = 20.0;
pub const MIDDLE_KERNEL_TAPS: usize = 5;
pub const OUTER_KERNEL_TAPS: usize = 9;
pub const MIDDLE_KERNEL_SIGMA: f32 = 1.0;
pub const OUTER_KERNEL_SIGMA: f32 = 2.0;

// Anaglyph luma weights (R, G, B)
pub const LUMA_WEIGHTS: [f32; 3] = [0.2989, 0.5870, 0.1140];

// Opaque black used for out-of-lens samples
pub const OUT_OF_BOUNDS_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

// Orientation tracking
pub const DEFAULT_IMU_ALPHA: f64 = 0.9; // gyro weight of the complementary filter
pub const GYRO_REST_EPSILON: f64 = 1e-8; // deg/s below which the rate counts as zero

#[inline]
pub fn default_lens_k() -> Vec2 {
    Vec2::new(DEFAULT_LENS_K[0], DEFAULT_LENS_K[1])
}
