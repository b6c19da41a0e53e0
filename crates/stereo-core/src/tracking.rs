//! Head orientation from a 6-axis IMU.
//!
//! Gyro rates are in deg/s, angles in degrees, timesteps in seconds. The
//! accelerometer may use any unit since only its direction is used. The IMU
//! frame is Y-up at rest, matching the camera convention of the transforms.

use glam::{DQuat, DVec3};

use crate::constants::{DEFAULT_IMU_ALPHA, GYRO_REST_EPSILON};
use crate::error::{Error, Result};

/// Pitch from the gravity direction.
pub fn compute_acc_pitch(acc: DVec3) -> f64 {
    let a = acc.normalize();
    let sgn = if a.y >= 0.0 { 1.0 } else { -1.0 };
    -a.z.atan2(sgn * (a.x * a.x + a.y * a.y).sqrt()).to_degrees()
}

/// Roll from the gravity direction.
pub fn compute_acc_roll(acc: DVec3) -> f64 {
    -(-acc.x).atan2(acc.y).to_degrees()
}

/// Integrate the roll rate (about Z) for one step.
#[inline]
pub fn compute_flatland_roll_gyr(prev: f64, gyr: DVec3, dt: f64) -> f64 {
    prev + gyr.z * dt
}

#[inline]
pub fn compute_flatland_roll_acc(acc: DVec3) -> f64 {
    acc.x.atan2(acc.y).to_degrees()
}

/// Complementary filter: `alpha` weights the integrated gyro estimate and
/// `1 - alpha` the accelerometer roll.
#[inline]
pub fn compute_flatland_roll_comp(prev: f64, gyr: DVec3, roll_acc: f64, dt: f64, alpha: f64) -> f64 {
    alpha * compute_flatland_roll_gyr(prev, gyr, dt) + (1.0 - alpha) * roll_acc
}

/// Apply one gyro step to `q`. A rate at rest leaves `q` unchanged.
pub fn update_quaternion_gyr(q: DQuat, gyr: DVec3, dt: f64) -> DQuat {
    let rate = gyr.length();
    if rate <= GYRO_REST_EPSILON {
        return q;
    }
    let delta = DQuat::from_axis_angle(gyr / rate, (rate * dt).to_radians());
    (q * delta).normalize()
}

/// Gyro prediction followed by a partial tilt correction towards gravity.
///
/// The accelerometer reading is rotated into the world frame; its angle `phi`
/// from world up is corrected by `(1 - alpha) * phi` about the horizontal
/// axis perpendicular to it. Yaw is left to the gyro.
pub fn update_quaternion_comp(q: DQuat, gyr: DVec3, acc: DVec3, dt: f64, alpha: f64) -> DQuat {
    let predicted = update_quaternion_gyr(q, gyr, dt);

    let up = (predicted * acc).normalize();
    if !up.is_finite() {
        return predicted;
    }
    let phi = up.y.clamp(-1.0, 1.0).acos().to_degrees();
    let axis = DVec3::new(-up.z, 0.0, up.x);
    let axis_len = axis.length();
    if axis_len <= f64::EPSILON {
        return predicted;
    }

    let correction = DQuat::from_axis_angle(axis / axis_len, ((1.0 - alpha) * phi).to_radians());
    (correction * predicted).normalize()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImuSample {
    pub gyr: DVec3,
    pub acc: DVec3,
    /// Seconds since the previous sample.
    pub dt: f64,
}

/// Per-axis mean (bias) and population variance of a resting IMU.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImuCalibration {
    pub gyr_bias: DVec3,
    pub gyr_variance: DVec3,
    pub acc_bias: DVec3,
    pub acc_variance: DVec3,
}

impl ImuCalibration {
    pub fn from_samples(samples: &[ImuSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptyCalibration);
        }
        let n = samples.len() as f64;
        let (mut gs, mut gs2, mut as_, mut as2) =
            (DVec3::ZERO, DVec3::ZERO, DVec3::ZERO, DVec3::ZERO);
        for s in samples {
            gs += s.gyr;
            gs2 += s.gyr * s.gyr;
            as_ += s.acc;
            as2 += s.acc * s.acc;
        }
        let gyr_bias = gs / n;
        let acc_bias = as_ / n;
        let cal = Self {
            gyr_bias,
            gyr_variance: gs2 / n - gyr_bias * gyr_bias,
            acc_bias,
            acc_variance: as2 / n - acc_bias * acc_bias,
        };
        log::debug!(
            "[imu] calibration from {} samples: gyr_bias={:?} gyr_var={:?}",
            samples.len(),
            cal.gyr_bias,
            cal.gyr_variance
        );
        Ok(cal)
    }
}

/// Every estimator's current output, updated together per sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationEstimate {
    pub flatland_roll_gyr: f64,
    pub flatland_roll_acc: f64,
    pub flatland_roll_comp: f64,
    pub quaternion_gyr: DQuat,
    /// `(pitch, 0, roll)` from the accelerometer alone.
    pub euler_acc: DVec3,
    pub quaternion_comp: DQuat,
}

impl Default for OrientationEstimate {
    fn default() -> Self {
        Self {
            flatland_roll_gyr: 0.0,
            flatland_roll_acc: 0.0,
            flatland_roll_comp: 0.0,
            quaternion_gyr: DQuat::IDENTITY,
            euler_acc: DVec3::ZERO,
            quaternion_comp: DQuat::IDENTITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrientationTracker {
    alpha: f64,
    gyr_bias: DVec3,
    estimate: OrientationEstimate,
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IMU_ALPHA)
    }
}

impl OrientationTracker {
    pub fn new(alpha: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&alpha));
        Self {
            alpha,
            gyr_bias: DVec3::ZERO,
            estimate: OrientationEstimate::default(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_gyro_bias(&mut self, bias: DVec3) {
        self.gyr_bias = bias;
    }

    pub fn calibrate(&mut self, calibration: &ImuCalibration) {
        self.set_gyro_bias(calibration.gyr_bias);
    }

    pub fn estimate(&self) -> &OrientationEstimate {
        &self.estimate
    }

    pub fn reset(&mut self) {
        self.estimate = OrientationEstimate::default();
    }

    /// Feed one sample through every estimator.
    pub fn process(&mut self, sample: &ImuSample) -> Result<&OrientationEstimate> {
        let dt = sample.dt;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidTimestep(dt));
        }
        let gyr = sample.gyr - self.gyr_bias;
        let acc = sample.acc;
        let e = &mut self.estimate;

        e.flatland_roll_gyr = compute_flatland_roll_gyr(e.flatland_roll_gyr, gyr, dt);
        e.flatland_roll_acc = compute_flatland_roll_acc(acc);
        e.flatland_roll_comp =
            compute_flatland_roll_comp(e.flatland_roll_comp, gyr, e.flatland_roll_acc, dt, self.alpha);
        e.quaternion_gyr = update_quaternion_gyr(e.quaternion_gyr, gyr, dt);
        e.euler_acc = DVec3::new(compute_acc_pitch(acc), 0.0, compute_acc_roll(acc));
        e.quaternion_comp = update_quaternion_comp(e.quaternion_comp, gyr, acc, dt, self.alpha);

        Ok(&self.estimate)
    }
}
