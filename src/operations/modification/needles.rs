use tracing::{debug, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::polyline::Polyline;
use crate::geometry::segment::Segment;
use crate::math::tolerance::points_equal;
use crate::math::Point2;

/// Removes the needles of a polyline.
///
/// A needle is a vertex where the path folds back over itself: the legs
/// on either side of it are contiguous, or the vertex repeats the next one.
/// Removing the vertex leaves a single leg covering both.
#[derive(Debug)]
pub struct RemoveNeedles<'a> {
    polyline: &'a mut Polyline,
    closed: bool,
}

impl<'a> RemoveNeedles<'a> {
    #[must_use]
    pub fn new(polyline: &'a mut Polyline) -> Self {
        Self {
            polyline,
            closed: false,
        }
    }

    /// Also checks the last and first legs around the closing vertex.
    #[must_use]
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Runs to a fixpoint and returns the number of removed vertices.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when closed processing is asked
    /// for a polyline whose end differs from its start.
    #[instrument(skip(self), fields(points = self.polyline.len(), closed = self.closed))]
    pub fn execute(&mut self) -> Result<usize> {
        if self.closed && !self.polyline.is_closed() {
            return Err(OperationError::InvalidInput(
                "closed needle removal requires a closed polyline".to_owned(),
            )
            .into());
        }
        let tol = self.polyline.tolerance();
        let mut points = self.polyline.points().to_vec();
        let before = points.len();

        // Re-closing on a new first vertex can fold the path again.
        loop {
            let pass_start = points.len();
            remove_open_needles(&mut points, tol);
            if self.closed {
                remove_closing_needles(&mut points, tol);
            }
            if points.len() == pass_start {
                break;
            }
        }

        let removed = before.saturating_sub(points.len());
        if removed > 0 {
            debug!(removed, "removed needles");
            self.polyline.replace_points(points);
        }
        Ok(removed)
    }
}

fn leg(a: &Point2, b: &Point2, tol: f64) -> Segment {
    let mut segment = Segment::new(*a, *b);
    segment.set_tolerance(tol);
    segment
}

/// Triplet scan: drops the middle vertex of any folded or repeated triplet, restarting from the start.
fn remove_open_needles(points: &mut Vec<Point2>, tol: f64) {
    let mut i = 1;
    while points.len() >= 3 && i + 1 < points.len() {
        let (back, middle, head) = (points[i - 1], points[i], points[i + 1]);
        let folded = points_equal(&back, &middle, tol)
            || points_equal(&middle, &head, tol)
            || leg(&middle, &head, tol).is_contiguous_to(&leg(&back, &middle, tol));
        if folded {
            points.remove(i);
            i = 1;
        } else {
            i += 1;
        }
    }
}

/// Folds around the closing vertex: the first and last legs overlap.
fn remove_closing_needles(points: &mut Vec<Point2>, tol: f64) {
    while points.len() >= 3 {
        let n = points.len();
        let head = leg(&points[0], &points[1], tol);
        let back = leg(&points[n - 2], &points[0], tol);
        if !head.is_contiguous_to(&back) {
            break;
        }
        points.remove(0);
        points.pop();
        // Re-close on the new first vertex, exactly.
        match (points.first().copied(), points.last_mut()) {
            (Some(first), Some(last)) if points_equal(last, &first, tol) => *last = first,
            (Some(first), Some(_)) => points.push(first),
            _ => break,
        }
    }
}
