use std::f64::consts::{PI, TAU};
use std::ops::{Add, Sub};

use crate::math::Vector2;

/// Angular slack used when no tolerance is given to bearing predicates.
pub const ANGULAR_EPSILON: f64 = 1e-10;

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to TAU itself.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// A direction in the plane, measured counterclockwise from East.
///
/// The raw angle is kept as given; comparisons work on the normalized
/// (trigonometric) value so that `θ` and `θ + 2kπ` are the same bearing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bearing {
    angle: f64,
}

impl Bearing {
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self { angle }
    }

    /// Bearing of the displacement `(dx, dy)`.
    #[must_use]
    pub fn from_displacement(dx: f64, dy: f64) -> Self {
        Self { angle: dy.atan2(dx) }
    }

    /// Raw angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angle normalized to `[0, 2π)`.
    #[must_use]
    pub fn trigo_value(&self) -> f64 {
        normalize_angle(self.angle)
    }

    #[must_use]
    pub fn opposite(&self) -> Self {
        *self + PI
    }

    /// Unit vector pointing along the bearing.
    #[must_use]
    pub fn unit_vector(&self) -> Vector2 {
        Vector2::new(self.angle.cos(), self.angle.sin())
    }

    /// Counterclockwise angle in `[0, 2π)` turned from `self` to `other`.
    #[must_use]
    pub fn sweep_to(&self, other: &Bearing) -> f64 {
        *other - *self
    }

    /// Equality modulo `2π` within `tol` radians.
    #[must_use]
    pub fn is_equal_to(&self, other: &Bearing, tol: f64) -> bool {
        let diff = (self.trigo_value() - other.trigo_value()).abs();
        diff <= tol || TAU - diff <= tol
    }

    /// Whether `other` lies within `sweep` radians of `self`.
    ///
    /// A positive sweep turns counterclockwise, a negative one clockwise.
    /// Both limits are included.
    #[must_use]
    pub fn is_bearing_within_sweep(&self, sweep: f64, other: &Bearing) -> bool {
        self.is_bearing_within_sweep_tol(sweep, other, ANGULAR_EPSILON)
    }

    /// [`Bearing::is_bearing_within_sweep`] with an explicit angular slack.
    #[must_use]
    pub fn is_bearing_within_sweep_tol(&self, sweep: f64, other: &Bearing, tol: f64) -> bool {
        if sweep.abs() >= TAU - tol {
            return true;
        }
        let delta = if sweep >= 0.0 {
            self.sweep_to(other)
        } else {
            other.sweep_to(self)
        };
        delta <= sweep.abs() + tol || delta >= TAU - tol
    }
}

impl Add<f64> for Bearing {
    type Output = Bearing;

    fn add(self, angle: f64) -> Bearing {
        Bearing::from_angle(self.angle + angle)
    }
}

impl Sub<f64> for Bearing {
    type Output = Bearing;

    fn sub(self, angle: f64) -> Bearing {
        Bearing::from_angle(self.angle - angle)
    }
}

/// `a - b` is the counterclockwise angle, in `[0, 2π)`, turned from `b` to `a`.
///
/// Hence `(a - b) + (b - a)` is either `0` or `2π`.
impl Sub<Bearing> for Bearing {
    type Output = f64;

    fn sub(self, other: Bearing) -> f64 {
        normalize_angle(self.angle - other.angle)
    }
}
