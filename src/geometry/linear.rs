//! Closed set of linear primitives with frame-checked cross-variant queries.

use crate::error::Result;
use crate::math::{Extent, Point2, Vector2};

use super::arc::Arc;
use super::frame::FrameId;
use super::polyline::{push_unique, Polyline};
use super::segment::{ExtremityProcessing, Segment};

#[derive(Debug, Clone, PartialEq)]
pub enum Linear {
    Segment(Segment),
    Polyline(Polyline),
    Arc(Arc),
}

impl From<Segment> for Linear {
    fn from(segment: Segment) -> Self {
        Linear::Segment(segment)
    }
}

impl From<Polyline> for Linear {
    fn from(polyline: Polyline) -> Self {
        Linear::Polyline(polyline)
    }
}

impl From<Arc> for Linear {
    fn from(arc: Arc) -> Self {
        Linear::Arc(arc)
    }
}

impl Linear {
    #[must_use]
    pub fn frame(&self) -> FrameId {
        match self {
            Linear::Segment(s) => s.frame(),
            Linear::Polyline(p) => p.frame(),
            Linear::Arc(a) => a.frame(),
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        match self {
            Linear::Segment(s) => s.tolerance(),
            Linear::Polyline(p) => p.tolerance(),
            Linear::Arc(a) => a.tolerance(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Linear::Segment(s) => s.length(),
            Linear::Polyline(p) => p.length(),
            Linear::Arc(a) => a.length(),
        }
    }

    /// `None` only for an empty polyline.
    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        match self {
            Linear::Segment(s) => Some(s.start_point()),
            Linear::Polyline(p) => p.start_point(),
            Linear::Arc(a) => Some(a.start_point()),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        match self {
            Linear::Segment(s) => Some(s.end_point()),
            Linear::Polyline(p) => p.end_point(),
            Linear::Arc(a) => Some(a.end_point()),
        }
    }

    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Linear::Segment(s) => Some(s.extent()),
            Linear::Polyline(p) => p.extent(),
            Linear::Arc(a) => Some(a.extent()),
        }
    }

    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= t <= 1`.
    pub fn relative_point(&self, t: f64) -> Result<Point2> {
        match self {
            Linear::Segment(s) => s.relative_point(t),
            Linear::Polyline(p) => p.relative_point(t),
            Linear::Arc(a) => a.relative_point(t),
        }
    }

    /// # Errors
    ///
    /// Propagates the variant's error for null or empty primitives.
    pub fn relative_position(&self, p: &Point2) -> Result<f64> {
        match self {
            Linear::Segment(s) => s.relative_position(p),
            Linear::Polyline(pl) => pl.relative_position(p),
            Linear::Arc(a) => a.relative_position(p),
        }
    }

    #[must_use]
    pub fn is_point_on(&self, p: &Point2, extremity: ExtremityProcessing, tol: Option<f64>) -> bool {
        match self {
            Linear::Segment(s) => s.is_point_on(p, extremity, tol),
            Linear::Polyline(pl) => pl.is_point_on(p, extremity, tol),
            Linear::Arc(a) => a.is_point_on(p, extremity, tol),
        }
    }

    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Option<Point2> {
        match self {
            Linear::Segment(s) => Some(s.closest_point(p)),
            Linear::Polyline(pl) => pl.closest_point(p),
            Linear::Arc(a) => Some(a.closest_point(p)),
        }
    }

    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= start <= end <= 1`.
    pub fn shorten(&mut self, start: f64, end: f64) -> Result<()> {
        match self {
            Linear::Segment(s) => s.shorten(start, end),
            Linear::Polyline(p) => p.shorten(start, end),
            Linear::Arc(a) => a.shorten(start, end),
        }
    }

    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when `p` is off the primitive.
    pub fn shorten_to(&mut self, p: &Point2) -> Result<()> {
        match self {
            Linear::Segment(s) => s.shorten_to(p),
            Linear::Polyline(pl) => pl.shorten_to(p),
            Linear::Arc(a) => a.shorten_to(p),
        }
    }

    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when `p` is off the primitive.
    pub fn shorten_from(&mut self, p: &Point2) -> Result<()> {
        match self {
            Linear::Segment(s) => s.shorten_from(p),
            Linear::Polyline(pl) => pl.shorten_from(p),
            Linear::Arc(a) => a.shorten_from(p),
        }
    }

    pub fn reverse(&mut self) {
        match self {
            Linear::Segment(s) => s.reverse(),
            Linear::Polyline(p) => p.reverse(),
            Linear::Arc(a) => a.reverse(),
        }
    }

    pub fn rotate(&mut self, angle: f64, origin: &Point2) {
        match self {
            Linear::Segment(s) => s.rotate(angle, origin),
            Linear::Polyline(p) => p.rotate(angle, origin),
            Linear::Arc(a) => a.rotate(angle, origin),
        }
    }

    pub fn translate(&mut self, displacement: &Vector2) {
        match self {
            Linear::Segment(s) => s.translate(displacement),
            Linear::Polyline(p) => p.translate(displacement),
            Linear::Arc(a) => a.translate(displacement),
        }
    }

    /// Crossing points between two primitives of the same frame.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::FrameMismatch` when the frames differ.
    pub fn intersect(&self, other: &Linear) -> Result<Vec<Point2>> {
        self.frame().ensure_same(other.frame())?;
        let points = match (self, other) {
            (Linear::Segment(a), Linear::Segment(b)) => {
                a.intersect_segment(b).point().into_iter().collect()
            }
            (Linear::Segment(s), Linear::Polyline(p)) | (Linear::Polyline(p), Linear::Segment(s)) => {
                p.intersect_segment(s)
            }
            (Linear::Polyline(a), Linear::Polyline(b)) => a.intersect_polyline(b),
            (Linear::Segment(s), Linear::Arc(a)) | (Linear::Arc(a), Linear::Segment(s)) => {
                a.intersect_segment(s)
            }
            (Linear::Polyline(p), Linear::Arc(a)) | (Linear::Arc(a), Linear::Polyline(p)) => {
                arc_polyline_intersections(a, p)
            }
            (Linear::Arc(a), Linear::Arc(b)) => a.intersect_arc(b),
        };
        Ok(points)
    }

    /// Whether the primitives cross away from their end points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::FrameMismatch` when the frames differ.
    pub fn crosses(&self, other: &Linear) -> Result<bool> {
        self.frame().ensure_same(other.frame())?;
        let crossing = match (self, other) {
            (Linear::Segment(a), Linear::Segment(b)) => a.crosses(b),
            (Linear::Segment(s), Linear::Polyline(p)) | (Linear::Polyline(p), Linear::Segment(s)) => {
                p.crosses_segment(s)
            }
            (Linear::Polyline(a), Linear::Polyline(b)) => a.crosses_polyline(b),
            _ => {
                let tol = self.tolerance().max(other.tolerance());
                self.intersect(other)?.iter().any(|p| {
                    self.is_point_on(p, ExtremityProcessing::Exclude, Some(tol))
                        && other.is_point_on(p, ExtremityProcessing::Exclude, Some(tol))
                })
            }
        };
        Ok(crossing)
    }
}

fn arc_polyline_intersections(arc: &Arc, polyline: &Polyline) -> Vec<Point2> {
    let tol = arc.tolerance().max(polyline.tolerance());
    let mut found = Vec::new();
    for leg in polyline.segments() {
        for p in arc.intersect_segment(&leg) {
            push_unique(&mut found, p, tol);
        }
    }
    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{GeometryError, PlanisError};
    use crate::geometry::Bearing;

    fn segment(ax: f64, ay: f64, bx: f64, by: f64) -> Linear {
        Segment::new(Point2::new(ax, ay), Point2::new(bx, by)).into()
    }

    fn circle(cx: f64, cy: f64, r: f64) -> Linear {
        Arc::from_center_sweep(Point2::new(cx, cy), Bearing::default(), TAU, r)
            .unwrap()
            .into()
    }

    #[test]
    fn dispatch_matches_variant() {
        let s = segment(0.0, 0.0, 4.0, 0.0);
        assert_relative_eq!(s.length(), 4.0);
        assert_eq!(s.start_point(), Some(Point2::new(0.0, 0.0)));
        let p = s.relative_point(0.25).unwrap();
        assert_relative_eq!(p.x, 1.0);

        let empty = Linear::from(Polyline::new());
        assert_eq!(empty.start_point(), None);
        assert_eq!(empty.extent(), None);

        let c = circle(0.0, 0.0, 1.0);
        assert_relative_eq!(c.length(), TAU);
    }

    #[test]
    fn segment_against_polyline_and_arc() {
        let s = segment(-10.0, 0.0, 10.0, 0.0);
        let zigzag = Linear::from(Polyline::from_points([
            Point2::new(-5.0, -1.0),
            Point2::new(0.0, 1.0),
            Point2::new(5.0, -1.0),
        ]));
        assert_eq!(s.intersect(&zigzag).unwrap().len(), 2);
        assert_eq!(zigzag.intersect(&s).unwrap().len(), 2);
        assert!(s.crosses(&zigzag).unwrap());

        let c = circle(0.0, 0.0, 3.0);
        let hits = s.intersect(&c).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(s.crosses(&c).unwrap());
        assert_eq!(c.intersect(&zigzag).unwrap().len(), 2);
    }

    #[test]
    fn touching_at_end_point_is_not_crossing() {
        let s = segment(3.0, 0.0, 10.0, 0.0);
        let upper = Linear::from(
            Arc::from_center_sweep(Point2::origin(), Bearing::default(), PI, 3.0).unwrap(),
        );
        assert_eq!(s.intersect(&upper).unwrap().len(), 1);
        assert!(!s.crosses(&upper).unwrap());
    }

    #[test]
    fn frames_must_match() {
        let a = segment(0.0, 0.0, 1.0, 1.0);
        let b = Linear::from(
            Segment::new(Point2::new(0.0, 1.0), Point2::new(1.0, 0.0)).with_frame(FrameId::new(7)),
        );
        let err = a.intersect(&b).unwrap_err();
        assert!(matches!(
            err,
            PlanisError::Geometry(GeometryError::FrameMismatch { .. })
        ));
        assert!(a.crosses(&b).is_err());
    }

    #[test]
    fn shorten_and_reverse_dispatch() {
        let mut s = segment(0.0, 0.0, 10.0, 0.0);
        s.shorten_to(&Point2::new(4.0, 0.0)).unwrap();
        assert_relative_eq!(s.length(), 4.0);
        s.reverse();
        assert_eq!(s.start_point(), Some(Point2::new(4.0, 0.0)));
        s.translate(&Vector2::new(0.0, 2.0));
        assert_eq!(s.end_point(), Some(Point2::new(0.0, 2.0)));
        assert!(s.shorten_from(&Point2::new(50.0, 50.0)).is_err());
    }
}
