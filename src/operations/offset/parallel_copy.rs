use tracing::{debug, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::line::Line;
use crate::geometry::polyline::Polyline;
use crate::geometry::segment::{CrossResult, Side};
use crate::math::tolerance::points_equal;
use crate::math::{Point2, Vector2};

/// An offset leg: the original leg moved along its normal.
#[derive(Debug, Clone, Copy)]
struct OffsetLeg {
    start: Point2,
    end: Point2,
}

impl OffsetLeg {
    fn direction(&self) -> Vector2 {
        self.end - self.start
    }

    fn line(&self, tol: f64) -> Line {
        let mut line = Line::from_points(&self.start, &self.end);
        line.set_tolerance(tol);
        line
    }
}

/// Builds a copy of a polyline at a constant distance on one side.
///
/// Every leg is moved along its normal; consecutive offset legs are joined
/// at the crossing of their supporting lines (a mitred join). Optional
/// alignment lines pin the first and last points of an open result.
#[derive(Debug)]
pub struct ParallelCopy<'a> {
    polyline: &'a Polyline,
    offset: f64,
    side: Side,
    first_alignment: Option<Line>,
    last_alignment: Option<Line>,
}

impl<'a> ParallelCopy<'a> {
    /// Creates a new parallel copy operation.
    #[must_use]
    pub fn new(polyline: &'a Polyline, offset: f64, side: Side) -> Self {
        Self {
            polyline,
            offset,
            side,
            first_alignment: None,
            last_alignment: None,
        }
    }

    /// The first point of the copy is moved onto `line`.
    #[must_use]
    pub fn first_alignment(mut self, line: Line) -> Self {
        self.first_alignment = Some(line);
        self
    }

    /// The last point of the copy is moved onto `line`.
    #[must_use]
    pub fn last_alignment(mut self, line: Line) -> Self {
        self.last_alignment = Some(line);
        self
    }

    /// Executes the copy.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when the offset is not strictly
    /// positive or the polyline has fewer than two distinct vertices.
    #[instrument(
        skip(self),
        fields(points = self.polyline.len(), offset = self.offset, side = ?self.side)
    )]
    pub fn execute(&self) -> Result<Polyline> {
        if !(self.offset > 0.0 && self.offset.is_finite()) {
            return Err(OperationError::InvalidInput(format!(
                "parallel copy offset must be positive, got {}",
                self.offset
            ))
            .into());
        }
        let tol = self.polyline.tolerance();

        // Step 1: Drop null legs.
        let mut vertices: Vec<Point2> = Vec::with_capacity(self.polyline.len());
        for p in self.polyline.points() {
            if vertices.last().is_none_or(|last| !points_equal(last, p, tol)) {
                vertices.push(*p);
            }
        }
        if vertices.len() < 2 {
            return Err(OperationError::InvalidInput(
                "parallel copy needs at least 2 distinct vertices".to_owned(),
            )
            .into());
        }

        // Step 2: Offset every leg.
        let legs: Vec<OffsetLeg> = vertices
            .windows(2)
            .map(|w| self.offset_leg(&w[0], &w[1]))
            .collect();

        // Step 3: Join consecutive offset legs.
        let closed = self.polyline.is_closed()
            && legs.len() >= 3
            && self.first_alignment.is_none()
            && self.last_alignment.is_none();

        let mut points = Vec::with_capacity(legs.len() + 1);
        let (first_leg, last_leg) = (legs[0], legs[legs.len() - 1]);
        let closing_join = if closed {
            join(&last_leg, &first_leg, tol)
        } else {
            Vec::new()
        };

        let first = match closing_join.last() {
            Some(p) => *p,
            None => align(
                &first_leg,
                first_leg.start,
                self.first_alignment.as_ref(),
                tol,
                "first",
            ),
        };
        points.push(first);
        for pair in legs.windows(2) {
            points.extend(join(&pair[0], &pair[1], tol));
        }
        match closing_join.first() {
            Some(p) => {
                // A reversal at the closing vertex contributes two points.
                if closing_join.len() > 1 {
                    points.push(*p);
                }
                points.push(first);
            }
            None => points.push(align(
                &last_leg,
                last_leg.end,
                self.last_alignment.as_ref(),
                tol,
                "last",
            )),
        }

        debug!(legs = legs.len(), points = points.len(), closed, "parallel copy built");
        Ok(Polyline::from_points(points).with_frame(self.polyline.frame()))
    }

    fn offset_leg(&self, a: &Point2, b: &Point2) -> OffsetLeg {
        let d = b - a;
        let left = Vector2::new(-d.y, d.x) / d.norm();
        let shift = match self.side {
            Side::Left => left * self.offset,
            Side::Right => -left * self.offset,
        };
        OffsetLeg {
            start: a + shift,
            end: b + shift,
        }
    }
}

/// Join between two consecutive offset legs.
///
/// Crossing supporting lines give their crossing point. Parallel ones give
/// the shared offset vertex, plus the next leg's start when the path turns
/// back on itself.
fn join(prev: &OffsetLeg, next: &OffsetLeg, tol: f64) -> Vec<Point2> {
    match prev.line(tol).intersect_line(&next.line(tol)) {
        CrossResult::CrossFound(p) => vec![p],
        _ if prev.direction().dot(&next.direction()) > 0.0 => vec![prev.end],
        _ => vec![prev.end, next.start],
    }
}

/// End point of the copy, moved onto `alignment` when it crosses the end leg.
fn align(
    leg: &OffsetLeg,
    default: Point2,
    alignment: Option<&Line>,
    tol: f64,
    which: &str,
) -> Point2 {
    let Some(alignment) = alignment else {
        return default;
    };
    match leg.line(tol).intersect_line(alignment) {
        CrossResult::CrossFound(p) => p,
        _ => {
            debug!(which, "alignment parallel to the end leg, ignored");
            default
        }
    }
}
