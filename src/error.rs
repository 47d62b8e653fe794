use thiserror::Error;

use crate::geometry::FrameId;

/// Top-level error type for the planis geometry kernel.
#[derive(Debug, Error)]
pub enum PlanisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("point is not located on the linear")]
    NotOnLinear,

    #[error("operands live in different frames ({left:?} and {right:?})")]
    FrameMismatch { left: FrameId, right: FrameId },
}

/// Errors related to multi-step operations on linears.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PlanisError`].
pub type Result<T> = std::result::Result<T, PlanisError>;

/// Checks that `value` lies in `[min, max]`.
///
/// # Errors
///
/// Returns `GeometryError::ParameterOutOfRange` otherwise (NaN included).
pub(crate) fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min,
            max,
        }
        .into())
    }
}

/// Checks the `0 <= start <= end <= 1` contract shared by every shortening operation.
pub(crate) fn check_relative_pair(start: f64, end: f64) -> Result<()> {
    check_range("start_relative", start, 0.0, 1.0)?;
    check_range("end_relative", end, start, 1.0)
}
