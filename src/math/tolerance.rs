//! Epsilon rules shared by every primitive.
//!
//! A primitive owns a [`Tolerance`]. In auto mode the value follows the
//! magnitude of the primitive's own coordinates:
//!
//! `min(max_epsilon, max(global_epsilon, epsilon_multiplier * max |coord|))`
//!
//! In fixed mode the value was set explicitly and is never overwritten.

use super::Point2;

/// Smallest auto tolerance.
pub const GLOBAL_EPSILON: f64 = 1e-8;

/// Ratio between the largest coordinate magnitude and the auto tolerance.
pub const EPSILON_MULTIPLIER: f64 = 1e-12;

/// Largest auto tolerance.
pub const MAX_EPSILON: f64 = 1e-3;

/// Parameters of the auto-tolerance rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceConfig {
    /// Floor of the auto tolerance.
    pub global_epsilon: f64,
    /// Scale applied to the largest absolute coordinate.
    pub epsilon_multiplier: f64,
    /// Cap of the auto tolerance.
    pub max_epsilon: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            global_epsilon: GLOBAL_EPSILON,
            epsilon_multiplier: EPSILON_MULTIPLIER,
            max_epsilon: MAX_EPSILON,
        }
    }
}

impl ToleranceConfig {
    /// Sets the floor of the auto tolerance.
    #[must_use]
    pub fn with_global_epsilon(mut self, value: f64) -> Self {
        self.global_epsilon = value.abs();
        self
    }

    /// Sets the coordinate multiplier.
    #[must_use]
    pub fn with_epsilon_multiplier(mut self, value: f64) -> Self {
        self.epsilon_multiplier = value.abs();
        self
    }

    /// Sets the cap of the auto tolerance.
    #[must_use]
    pub fn with_max_epsilon(mut self, value: f64) -> Self {
        self.max_epsilon = value.abs();
        self
    }

    /// Computes the auto tolerance of a set of points.
    #[must_use]
    pub fn compute<'a, I>(&self, points: I) -> f64
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let magnitude = points
            .into_iter()
            .fold(0.0_f64, |acc, p| acc.max(p.x.abs()).max(p.y.abs()));
        let tolerance = self.global_epsilon.max(self.epsilon_multiplier * magnitude);
        // NaN coordinates must not poison the tolerance.
        if tolerance.is_nan() {
            return self.global_epsilon.min(self.max_epsilon);
        }
        tolerance.min(self.max_epsilon)
    }
}

/// Computes the auto tolerance of `points` with the default configuration.
#[must_use]
pub fn compute_auto_tolerance<'a, I>(points: I) -> f64
where
    I: IntoIterator<Item = &'a Point2>,
{
    ToleranceConfig::default().compute(points)
}

/// The tolerance owned by a primitive.
///
/// Carries the [`ToleranceConfig`] its auto value is derived with, so a
/// primitive built with a custom rule keeps it across mutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    value: f64,
    auto: bool,
    config: ToleranceConfig,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            value: GLOBAL_EPSILON,
            auto: true,
            config: ToleranceConfig::default(),
        }
    }
}

impl Tolerance {
    /// Auto tolerance computed from `points` with the default configuration.
    #[must_use]
    pub fn auto_from<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let config = ToleranceConfig::default();
        Self {
            value: config.compute(points),
            auto: true,
            config,
        }
    }

    /// Explicit tolerance. Negative values are taken by magnitude.
    #[must_use]
    pub fn fixed(value: f64) -> Self {
        Self {
            value: value.abs(),
            auto: false,
            config: ToleranceConfig::default(),
        }
    }

    /// Current epsilon.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Whether the value follows the coordinates.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Rule used for the auto value.
    #[must_use]
    pub fn config(&self) -> ToleranceConfig {
        self.config
    }

    /// Replaces the auto rule and re-derives the value from `points`.
    pub fn set_config<'a, I>(&mut self, config: ToleranceConfig, points: I)
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        self.config = config;
        self.refresh(points);
    }

    /// Switches to fixed mode, keeping the auto rule for a later [`Tolerance::make_auto`].
    pub fn fix(&mut self, value: f64) {
        self.value = value.abs();
        self.auto = false;
    }

    /// Re-derives the value from `points` when in auto mode.
    pub fn refresh<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        if self.auto {
            self.value = self.config.compute(points);
        }
    }

    /// Widens an auto value so that it also covers `p`.
    ///
    /// Equivalent to a full refresh after appending `p`, in constant time.
    pub fn include(&mut self, p: &Point2) {
        if self.auto {
            self.value = self.value.max(self.config.compute([p]));
        }
    }

    /// Switches back to auto mode and re-derives the value.
    pub fn make_auto<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        self.auto = true;
        self.refresh(points);
    }

    /// Picks an explicit override or falls back to this tolerance.
    #[must_use]
    pub fn or_override(&self, tolerance: Option<f64>) -> f64 {
        tolerance.map_or(self.value, f64::abs)
    }
}

/// `a == b` within `tol`.
#[must_use]
pub fn eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// `a >= b` within `tol`.
#[must_use]
pub fn greater_or_equal(a: f64, b: f64, tol: f64) -> bool {
    a >= b - tol
}

/// `a <= b` within `tol`.
#[must_use]
pub fn smaller_or_equal(a: f64, b: f64, tol: f64) -> bool {
    a <= b + tol
}

/// `a > b` beyond `tol`.
#[must_use]
pub fn greater(a: f64, b: f64, tol: f64) -> bool {
    a > b + tol
}

/// `a < b` beyond `tol`.
#[must_use]
pub fn smaller(a: f64, b: f64, tol: f64) -> bool {
    a < b - tol
}

/// Points are equal when both coordinate deltas are within `tol`.
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2, tol: f64) -> bool {
    eq(a.x, b.x, tol) && eq(a.y, b.y, tol)
}
