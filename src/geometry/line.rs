use crate::error::{GeometryError, Result};
use crate::math::tolerance::eq;
use crate::math::{Point2, Tolerance, Vector2};

use super::bearing::Bearing;
use super::segment::CrossResult;

/// Slope magnitude above which a line is stored in inverted form.
pub const SLOPE_INVERSION_THRESHOLD: f64 = 2.0;

/// An infinite line.
///
/// Stored as `y = slope * x + intercept`, or, when the slope magnitude
/// exceeds [`SLOPE_INVERSION_THRESHOLD`], as `x = slope * y + intercept`
/// with `inverted` set. Vertical lines therefore never need infinities.
/// The public accessors always answer in the `y = m x + b` convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    slope: f64,
    intercept: f64,
    inverted: bool,
    tolerance: Tolerance,
}

impl Line {
    /// Line through two points.
    ///
    /// Coincident points give the vertical line through them.
    #[must_use]
    pub fn from_points(a: &Point2, b: &Point2) -> Self {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let tolerance = Tolerance::auto_from([a, b]);

        if dy.abs() > SLOPE_INVERSION_THRESHOLD * dx.abs() || (dx == 0.0 && dy == 0.0) {
            let slope = if dy == 0.0 { 0.0 } else { dx / dy };
            Self {
                slope,
                intercept: a.x - slope * a.y,
                inverted: true,
                tolerance,
            }
        } else {
            let slope = dy / dx;
            Self {
                slope,
                intercept: a.y - slope * a.x,
                inverted: false,
                tolerance,
            }
        }
    }

    /// Line through `point` heading along `bearing`.
    #[must_use]
    pub fn from_point_bearing(point: &Point2, bearing: &Bearing) -> Self {
        let mut dir = bearing.unit_vector();
        // cos(π/2) is not exactly zero; snap so that vertical bearings give vertical lines.
        if dir.x.abs() < 1e-15 {
            dir.x = 0.0;
        }
        if dir.y.abs() < 1e-15 {
            dir.y = 0.0;
        }
        Self::from_points(point, &(point + dir))
    }

    /// Line `y = slope * x + intercept`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a non-finite slope or
    /// intercept. Vertical lines must be built from points or a bearing.
    pub fn from_slope_intercept(slope: f64, intercept: f64) -> Result<Self> {
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(GeometryError::Degenerate(
                "vertical line cannot be given by slope and intercept".into(),
            )
            .into());
        }
        let tolerance = Tolerance::auto_from([&Point2::new(0.0, intercept)]);
        if slope.abs() > SLOPE_INVERSION_THRESHOLD {
            Ok(Self {
                slope: 1.0 / slope,
                intercept: -intercept / slope,
                inverted: true,
                tolerance,
            })
        } else {
            Ok(Self {
                slope,
                intercept,
                inverted: false,
                tolerance,
            })
        }
    }

    /// Slope in the `y = m x + b` convention; infinite for vertical lines.
    #[must_use]
    pub fn slope(&self) -> f64 {
        if !self.inverted {
            self.slope
        } else if self.slope == 0.0 {
            f64::INFINITY
        } else {
            1.0 / self.slope
        }
    }

    /// Y intercept; for a vertical line, the X intercept.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        if !self.inverted || self.slope == 0.0 {
            self.intercept
        } else {
            -self.intercept / self.slope
        }
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.inverted && self.slope == 0.0
    }

    /// Whether the `x = k y + c` form is the stored one.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance.value()
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance.fix(tolerance);
    }

    /// Unit direction vector.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        let v = if self.inverted {
            Vector2::new(self.slope, 1.0)
        } else {
            Vector2::new(1.0, self.slope)
        };
        v / v.norm()
    }

    /// Some point of the line.
    #[must_use]
    pub fn anchor(&self) -> Point2 {
        if self.inverted {
            Point2::new(self.intercept, 0.0)
        } else {
            Point2::new(0.0, self.intercept)
        }
    }

    /// Denominator of the 2x2 system against `other`; zero means parallel.
    fn determinant(&self, other: &Line) -> f64 {
        match (self.inverted, other.inverted) {
            (false, false) | (true, true) => self.slope - other.slope,
            (false, true) | (true, false) => 1.0 - self.slope * other.slope,
        }
    }

    #[must_use]
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        let tol = self.tolerance().max(other.tolerance());
        eq(self.determinant(other), 0.0, tol)
    }

    /// Intersects two lines.
    ///
    /// Returns `CrossResult::Parallel` when the slopes match within tolerance,
    /// `CrossResult::CrossFound` otherwise.
    #[must_use]
    pub fn intersect_line(&self, other: &Line) -> CrossResult {
        if self.is_parallel_to(other) {
            return CrossResult::Parallel;
        }
        let det = self.determinant(other);
        let point = match (self.inverted, other.inverted) {
            (false, false) => {
                let x = (other.intercept - self.intercept) / det;
                Point2::new(x, self.slope * x + self.intercept)
            }
            (true, true) => {
                let y = (other.intercept - self.intercept) / det;
                Point2::new(self.slope * y + self.intercept, y)
            }
            (false, true) => {
                // y = m x + b and x = k y + c
                let x = (other.slope * self.intercept + other.intercept) / det;
                Point2::new(x, self.slope * x + self.intercept)
            }
            (true, false) => {
                let y = (other.slope * self.intercept + other.intercept) / det;
                Point2::new(self.slope * y + self.intercept, y)
            }
        };
        CrossResult::CrossFound(point)
    }

    /// Orthogonal projection of `p` on the line.
    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Point2 {
        let k = self.slope;
        let c = self.intercept;
        if self.inverted {
            let y = (p.y + k * (p.x - c)) / (1.0 + k * k);
            Point2::new(k * y + c, y)
        } else {
            let x = (p.x + k * (p.y - c)) / (1.0 + k * k);
            Point2::new(x, k * x + c)
        }
    }

    #[must_use]
    pub fn shortest_distance(&self, p: &Point2) -> f64 {
        (p - self.closest_point(p)).norm()
    }

    /// Whether `p` lies on the line within `tol` (own tolerance when `None`).
    #[must_use]
    pub fn is_point_on(&self, p: &Point2, tol: Option<f64>) -> bool {
        self.shortest_distance(p) <= self.tolerance.or_override(tol)
    }

    /// Same supporting line within `tol`.
    #[must_use]
    pub fn is_equal_to(&self, other: &Line, tol: Option<f64>) -> bool {
        self.is_parallel_to(other) && self.is_point_on(&other.anchor(), tol)
    }
}
