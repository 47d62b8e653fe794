//! Similarity transforms about an arbitrary origin.
//!
//! Every transform a linear primitive supports (rotation, translation and
//! uniform scaling) is a similarity, which keeps arcs circular.

use std::f64::consts::PI;

use crate::error::{OperationError, Result};

use super::{Point2, Vector2};

pub type Similarity2 = nalgebra::Similarity2<f64>;

/// Rotation by `angle` radians (counterclockwise) about `origin`.
#[must_use]
pub fn rotation_about(angle: f64, origin: &Point2) -> Similarity2 {
    // p' = o + R (p - o) = R p + (o - R o)
    let rotated = nalgebra::Rotation2::new(angle) * origin.coords;
    Similarity2::new(origin.coords - rotated, angle, 1.0)
}

#[must_use]
pub fn translation(displacement: &Vector2) -> Similarity2 {
    Similarity2::new(*displacement, 0.0, 1.0)
}

/// Uniform scaling by `factor` about `origin`.
///
/// A negative factor is a half turn followed by a positive scaling.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` for a zero or non-finite factor.
pub fn scaling_about(factor: f64, origin: &Point2) -> Result<Similarity2> {
    if factor == 0.0 || !factor.is_finite() {
        return Err(OperationError::InvalidInput(format!(
            "scale factor must be finite and non-zero, got {factor}"
        ))
        .into());
    }
    let angle = if factor < 0.0 { PI } else { 0.0 };
    Ok(Similarity2::new(
        origin.coords * (1.0 - factor),
        angle,
        factor.abs(),
    ))
}

/// Rotation angle carried by `sim`, in radians.
#[must_use]
pub fn rotation_angle(sim: &Similarity2) -> f64 {
    sim.isometry.rotation.angle()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rotation_about_non_origin_point() {
        let sim = rotation_about(FRAC_PI_2, &Point2::new(1.0, 1.0));
        let p = sim.transform_point(&Point2::new(2.0, 1.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(rotation_angle(&sim), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn translation_moves_points() {
        let sim = translation(&Vector2::new(3.0, -1.0));
        let p = sim.transform_point(&Point2::new(1.0, 1.0));
        assert_relative_eq!(p.x, 4.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn scaling_keeps_origin_fixed() {
        let origin = Point2::new(2.0, 3.0);
        let sim = scaling_about(2.0, &origin).unwrap();
        let fixed = sim.transform_point(&origin);
        assert_relative_eq!(fixed.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fixed.y, 3.0, epsilon = 1e-12);
        let p = sim.transform_point(&Point2::new(3.0, 3.0));
        assert_relative_eq!(p.x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_scaling_flips_through_origin() {
        let sim = scaling_about(-1.0, &Point2::origin()).unwrap();
        let p = sim.transform_point(&Point2::new(1.0, 2.0));
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_scaling_rejected() {
        assert!(scaling_about(0.0, &Point2::origin()).is_err());
        assert!(scaling_about(f64::NAN, &Point2::origin()).is_err());
    }
}
