use thiserror::Error;

/// Recoverable conditions surfaced to hosts.
///
/// The numerical kernels never return these; they are produced by the
/// validation helpers a host calls once per session (display configuration,
/// buffer shapes) and by the orientation tracker's sample intake.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("display parameter `{field}` must be finite and positive, got {value}")]
    InvalidDisplay { field: &'static str, value: f32 },

    #[error("side-by-side stereo needs an even canvas width, got {0}")]
    OddStereoWidth(u32),

    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    ImageSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("buffer length {actual} does not match {expected} texels")]
    BufferLength { expected: usize, actual: usize },

    #[error("IMU sample timestep must be positive, got {0}")]
    InvalidTimestep(f64),

    #[error("IMU calibration needs at least one sample")]
    EmptyCalibration,
}

pub type Result<T> = std::result::Result<T, Error>;
