// Host-side scene and output constants for the reference frame pipeline.

// Test scene layout (object space, mm)
pub const SPHERE_CENTERS: [[f32; 3]; 3] = [
    [-120.0, 0.0, 150.0],  // near, left
    [0.0, 0.0, 0.0],       // middle, at the target
    [140.0, 20.0, -400.0], // far, right
];
pub const SPHERE_RADII: [f32; 3] = [50.0, 70.0, 90.0];
pub const SPHERE_COLORS: [[f32; 3]; 3] = [
    [0.9, 0.3, 0.3], // red-ish
    [0.3, 0.9, 0.4], // green-ish
    [0.3, 0.5, 0.9], // blue-ish
];

// Checkered floor below the spheres
pub const FLOOR_HEIGHT: f32 = -100.0;
pub const FLOOR_TILE_MM: f32 = 100.0;
pub const FLOOR_COLORS: [[f32; 3]; 2] = [[0.85, 0.85, 0.85], [0.25, 0.25, 0.25]];

// Lighting (world space)
pub const LIGHT_POSITION: [f32; 3] = [400.0, 600.0, 800.0];
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_LIGHT: [f32; 3] = [0.35, 0.35, 0.35];

// Cleared background and its depth (far plane)
pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.04, 1.0];
pub const BACKGROUND_DEPTH: f32 = 1.0;

// Gaze defaults to the viewport centre (normalised)
pub const DEFAULT_GAZE_UV: [f32; 2] = [0.5, 0.5];
