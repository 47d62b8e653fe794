mod recompose;
mod slice;

use tracing::{debug, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::polyline::Polyline;
use crate::operations::query::self_intersect;

/// Splits a polyline at its self crossings.
///
/// Without closed processing the result is the list of pieces in path
/// order. With closed processing the polyline must be closed and the
/// pieces are chained back into closed loops that no longer cross
/// themselves.
#[derive(Debug)]
pub struct SplitAutoCrossing<'a> {
    polyline: &'a Polyline,
    closed: bool,
}

impl<'a> SplitAutoCrossing<'a> {
    /// Creates a new split operation.
    #[must_use]
    pub fn new(polyline: &'a Polyline) -> Self {
        Self {
            polyline,
            closed: false,
        }
    }

    /// Recomposes closed loops from the pieces.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Executes the split.
    ///
    /// A polyline that does not cross itself comes back as a single piece.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when closed processing is asked
    /// for an open polyline, or `OperationError::Failed` when a piece
    /// collapses under the tolerance or the pieces cannot be chained.
    #[instrument(skip(self), fields(points = self.polyline.len(), closed = self.closed))]
    pub fn execute(&self) -> Result<Vec<Polyline>> {
        if self.closed && !self.polyline.is_closed() {
            return Err(OperationError::InvalidInput(
                "closed processing requires a closed polyline".to_owned(),
            )
            .into());
        }

        // Step 1: Find every self crossing.
        let intersections = self_intersect::find_all(self.polyline);
        if intersections.is_empty() {
            return Ok(vec![self.polyline.clone()]);
        }

        // Step 2: Cut both legs of each crossing.
        let tol = self.polyline.tolerance();
        let pieces = slice::build(self.polyline.points(), &intersections, tol)?;
        debug!(crossings = intersections.len(), pieces = pieces.len(), "split at crossings");

        // Step 3: Chain pieces into loops.
        let pieces = if self.closed {
            recompose::connect(&pieces, tol)?
        } else {
            pieces
        };

        Ok(pieces
            .into_iter()
            .map(|points| Polyline::from_points(points).with_frame(self.polyline.frame()))
            .collect())
    }
}
