use std::f64::consts::FRAC_PI_2;

use crate::error::{check_range, check_relative_pair, GeometryError, Result};
use crate::math::tolerance::points_equal;
use crate::math::transform::{rotation_about, scaling_about, translation};
use crate::math::{Extent, Point2, Similarity2, Tolerance, ToleranceConfig, Vector2};

use super::bearing::Bearing;
use super::frame::FrameId;
use super::line::Line;

/// Outcome of an intersection, without the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossStatus {
    CrossFound,
    Parallel,
    NoCross,
}

/// Outcome of an intersection between two straight primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossResult {
    CrossFound(Point2),
    Parallel,
    NoCross,
}

impl CrossResult {
    #[must_use]
    pub fn status(&self) -> CrossStatus {
        match self {
            Self::CrossFound(_) => CrossStatus::CrossFound,
            Self::Parallel => CrossStatus::Parallel,
            Self::NoCross => CrossStatus::NoCross,
        }
    }

    /// The cross point, if any.
    #[must_use]
    pub fn point(&self) -> Option<Point2> {
        match self {
            Self::CrossFound(p) => Some(*p),
            _ => None,
        }
    }
}

/// Whether the end points of a linear count as on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtremityProcessing {
    #[default]
    Include,
    Exclude,
}

/// Side of a directed linear, looking from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A bounded straight piece between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    start: Point2,
    end: Point2,
    tolerance: Tolerance,
    frame: FrameId,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            tolerance: Tolerance::auto_from([&start, &end]),
            frame: FrameId::DEFAULT,
        }
    }

    /// Segment from `start` to `start + displacement`.
    #[must_use]
    pub fn from_displacement(start: Point2, displacement: Vector2) -> Self {
        Self::new(start, start + displacement)
    }

    #[must_use]
    pub fn with_frame(mut self, frame: FrameId) -> Self {
        self.frame = frame;
        self
    }

    /// Derives the auto tolerance with `config` from now on.
    #[must_use]
    pub fn with_tolerance_config(mut self, config: ToleranceConfig) -> Self {
        self.tolerance.set_config(config, [&self.start, &self.end]);
        self
    }

    #[must_use]
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.end
    }

    pub fn set_start_point(&mut self, p: Point2) {
        self.start = p;
        self.refresh_tolerance();
    }

    pub fn set_end_point(&mut self, p: Point2) {
        self.end = p;
        self.refresh_tolerance();
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance.value()
    }

    #[must_use]
    pub fn is_auto_tolerance(&self) -> bool {
        self.tolerance.is_auto()
    }

    /// Fixes the tolerance; it is no longer re-derived on mutation.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance.fix(tolerance);
    }

    pub fn set_auto_tolerance(&mut self) {
        self.tolerance.make_auto([&self.start, &self.end]);
    }

    fn refresh_tolerance(&mut self) {
        self.tolerance.refresh([&self.start, &self.end]);
    }

    /// Start and end coincide within tolerance.
    #[must_use]
    pub fn is_null(&self) -> bool {
        points_equal(&self.start, &self.end, self.tolerance())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::from_corners(&self.start, &self.end)
    }

    /// Supporting line, carrying this segment's tolerance.
    #[must_use]
    pub fn line(&self) -> Line {
        let mut line = Line::from_points(&self.start, &self.end);
        line.set_tolerance(self.tolerance());
        line
    }

    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a null segment.
    pub fn bearing(&self) -> Result<Bearing> {
        if self.is_null() {
            return Err(GeometryError::Degenerate("bearing of a null segment".into()).into());
        }
        let d = self.end - self.start;
        Ok(Bearing::from_displacement(d.x, d.y))
    }

    /// Bearing perpendicular to the segment, toward `side`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a null segment.
    pub fn perpendicular_bearing(&self, side: Side) -> Result<Bearing> {
        let bearing = self.bearing()?;
        Ok(match side {
            Side::Left => bearing + FRAC_PI_2,
            Side::Right => bearing - FRAC_PI_2,
        })
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Crosses the supporting line with `line`; the point must lie on the segment.
    #[must_use]
    pub fn intersect_line(&self, line: &Line) -> CrossResult {
        if self.is_null() {
            return CrossResult::NoCross;
        }
        match self.line().intersect_line(line) {
            CrossResult::CrossFound(p) if self.is_point_on(&p, ExtremityProcessing::Include, None) => {
                CrossResult::CrossFound(p)
            }
            CrossResult::Parallel => CrossResult::Parallel,
            _ => CrossResult::NoCross,
        }
    }

    /// Crosses two segments.
    ///
    /// A touch at an extremity of either segment is a connection, not a
    /// crossing, and yields `NoCross`. Segments on the same supporting line
    /// give `Parallel` when their extents overlap and `NoCross` otherwise.
    #[must_use]
    pub fn intersect_segment(&self, other: &Segment) -> CrossResult {
        if self.is_null() || other.is_null() {
            return CrossResult::NoCross;
        }
        let tol = self.tolerance().max(other.tolerance());
        let extents_overlap = self.extent().overlaps(&other.extent(), tol);

        match self.line().intersect_line(&other.line()) {
            CrossResult::Parallel => {
                if self.shares_line_with(other, tol) && !extents_overlap {
                    CrossResult::NoCross
                } else {
                    CrossResult::Parallel
                }
            }
            CrossResult::CrossFound(p) => {
                if extents_overlap
                    && self.is_point_on(&p, ExtremityProcessing::Exclude, Some(tol))
                    && other.is_point_on(&p, ExtremityProcessing::Exclude, Some(tol))
                {
                    CrossResult::CrossFound(p)
                } else {
                    CrossResult::NoCross
                }
            }
            CrossResult::NoCross => CrossResult::NoCross,
        }
    }

    /// Whether `p` lies on the segment within `tol` (own tolerance when `None`).
    #[must_use]
    pub fn is_point_on(&self, p: &Point2, extremity: ExtremityProcessing, tol: Option<f64>) -> bool {
        let tol = self.tolerance.or_override(tol);
        let on_extremity =
            points_equal(p, &self.start, tol) || points_equal(p, &self.end, tol);
        if extremity == ExtremityProcessing::Exclude && on_extremity {
            return false;
        }
        if self.is_null() {
            return on_extremity;
        }
        self.extent().contains_point(p, tol) && self.line().is_point_on(p, Some(tol))
    }

    /// Relative position of `p`, 0 at the start and 1 at the end.
    ///
    /// `p` is expected on the supporting line. The ratio is taken on the
    /// axis where the segment spans the most. The result is not clamped.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a null segment.
    pub fn relative_position(&self, p: &Point2) -> Result<f64> {
        if self.is_null() {
            return Err(
                GeometryError::Degenerate("relative position on a null segment".into()).into(),
            );
        }
        let d = self.end - self.start;
        if d.y.abs() > d.x.abs() {
            Ok((p.y - self.start.y) / d.y)
        } else {
            Ok((p.x - self.start.x) / d.x)
        }
    }

    /// Point at relative position `t`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= t <= 1`.
    pub fn relative_point(&self, t: f64) -> Result<Point2> {
        check_range("relative_position", t, 0.0, 1.0)?;
        Ok(self.point_at(t))
    }

    fn point_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    /// Projection parameter of `p` along the segment, unclamped.
    fn projection_parameter(&self, p: &Point2) -> f64 {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            0.0
        } else {
            (p - self.start).dot(&d) / len2
        }
    }

    /// Point of the segment closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Point2 {
        self.point_at(self.projection_parameter(p).clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn shortest_distance(&self, p: &Point2) -> f64 {
        (p - self.closest_point(p)).norm()
    }

    /// Keeps the part between relative positions `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= start <= end <= 1`.
    pub fn shorten(&mut self, start: f64, end: f64) -> Result<()> {
        check_relative_pair(start, end)?;
        let (a, b) = (self.point_at(start), self.point_at(end));
        self.start = a;
        self.end = b;
        self.refresh_tolerance();
        Ok(())
    }

    /// Keeps the part between two points of the segment.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when a point is off the segment,
    /// or `ParameterOutOfRange` when `a` comes after `b`.
    pub fn shorten_points(&mut self, a: &Point2, b: &Point2) -> Result<()> {
        let s = self.position_of(a)?;
        let e = self.position_of(b)?;
        self.shorten(s, e)
    }

    /// Keeps the part from the start up to `p`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when `p` is off the segment.
    pub fn shorten_to(&mut self, p: &Point2) -> Result<()> {
        let e = self.position_of(p)?;
        self.shorten(0.0, e)
    }

    /// Keeps the part from `p` up to the end.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when `p` is off the segment.
    pub fn shorten_from(&mut self, p: &Point2) -> Result<()> {
        let s = self.position_of(p)?;
        self.shorten(s, 1.0)
    }

    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= end <= 1`.
    pub fn shorten_to_relative(&mut self, end: f64) -> Result<()> {
        self.shorten(0.0, end)
    }

    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= start <= 1`.
    pub fn shorten_from_relative(&mut self, start: f64) -> Result<()> {
        self.shorten(start, 1.0)
    }

    /// Relative position of a point known to be on the segment, snapped into `[0, 1]`.
    fn position_of(&self, p: &Point2) -> Result<f64> {
        if !self.is_point_on(p, ExtremityProcessing::Include, None) {
            return Err(GeometryError::NotOnLinear.into());
        }
        if self.is_null() {
            return Ok(0.0);
        }
        Ok(self.relative_position(p)?.clamp(0.0, 1.0))
    }

    pub(crate) fn transform(&mut self, sim: &Similarity2) {
        self.start = sim.transform_point(&self.start);
        self.end = sim.transform_point(&self.end);
        self.refresh_tolerance();
    }

    /// Rotates counterclockwise by `angle` radians about `origin`.
    pub fn rotate(&mut self, angle: f64, origin: &Point2) {
        self.transform(&rotation_about(angle, origin));
    }

    pub fn translate(&mut self, displacement: &Vector2) {
        self.transform(&translation(displacement));
    }

    /// Scales about `origin`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a zero or non-finite factor.
    pub fn scale(&mut self, factor: f64, origin: &Point2) -> Result<()> {
        self.transform(&scaling_about(factor, origin)?);
        Ok(())
    }

    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Signed area of the triangle `(ray_origin, start, end)`.
    ///
    /// Summed over the legs of a closed chain, this is the chain's signed area.
    #[must_use]
    pub fn ray_area(&self, ray_origin: &Point2) -> f64 {
        let a = self.start - ray_origin;
        let b = self.end - ray_origin;
        (a.x * b.y - a.y * b.x) / 2.0
    }

    // Relations

    fn pair_tolerance(&self, other: &Segment) -> f64 {
        self.tolerance().max(other.tolerance())
    }

    /// Both end points of each segment lie on the other's supporting line.
    fn shares_line_with(&self, other: &Segment, tol: f64) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        let mine = self.line();
        let theirs = other.line();
        mine.is_point_on(&other.start, Some(tol))
            && mine.is_point_on(&other.end, Some(tol))
            && theirs.is_point_on(&self.start, Some(tol))
            && theirs.is_point_on(&self.end, Some(tol))
    }

    /// Shared run of two segments on one line, as parameters of `self`.
    fn overlap_parameters(&self, other: &Segment, tol: f64) -> Option<(f64, f64)> {
        if !self.extent().overlaps(&other.extent(), tol) || !self.shares_line_with(other, tol) {
            return None;
        }
        let a = self.projection_parameter(&other.start);
        let b = self.projection_parameter(&other.end);
        let lo = a.min(b).max(0.0);
        let hi = a.max(b).min(1.0);
        if (hi - lo) * self.length() > tol {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// The two segments share an end point.
    #[must_use]
    pub fn links_to(&self, other: &Segment) -> bool {
        let tol = self.pair_tolerance(other);
        [self.start, self.end].iter().any(|p| {
            points_equal(p, &other.start, tol) || points_equal(p, &other.end, tol)
        })
    }

    /// An end point of one segment lies on the other.
    #[must_use]
    pub fn connects_to(&self, other: &Segment) -> bool {
        let tol = self.pair_tolerance(other);
        if !self.extent().overlaps(&other.extent(), tol) {
            return false;
        }
        let on = |seg: &Segment, p: &Point2| seg.is_point_on(p, ExtremityProcessing::Include, Some(tol));
        on(other, &self.start) || on(other, &self.end) || on(self, &other.start) || on(self, &other.end)
    }

    /// The segments share a run longer than the tolerance.
    #[must_use]
    pub fn is_contiguous_to(&self, other: &Segment) -> bool {
        self.overlap_parameters(other, self.pair_tolerance(other)).is_some()
    }

    /// The segments lie on the same line and connect.
    #[must_use]
    pub fn is_adjacent_to(&self, other: &Segment) -> bool {
        let tol = self.pair_tolerance(other);
        self.extent().overlaps(&other.extent(), tol)
            && self.shares_line_with(other, tol)
            && self.connects_to(other)
    }

    /// The segments connect without sharing a run.
    #[must_use]
    pub fn is_flirting_with(&self, other: &Segment) -> bool {
        self.connects_to(other) && !self.is_contiguous_to(other)
    }

    #[must_use]
    pub fn crosses(&self, other: &Segment) -> bool {
        self.extent().overlaps(&other.extent(), self.pair_tolerance(other))
            && matches!(self.intersect_segment(other), CrossResult::CrossFound(_))
    }

    #[must_use]
    pub fn is_touching(&self, other: &Segment) -> bool {
        self.crosses(other) || self.connects_to(other) || self.is_adjacent_to(other)
    }

    /// End points of the run shared with `other`, ordered along `self`.
    #[must_use]
    pub fn contiguousness_points(&self, other: &Segment) -> Option<(Point2, Point2)> {
        self.overlap_parameters(other, self.pair_tolerance(other))
            .map(|(lo, hi)| (self.point_at(lo), self.point_at(hi)))
    }

    #[must_use]
    pub fn is_parallel_to(&self, other: &Segment) -> bool {
        !self.is_null() && !other.is_null() && self.line().is_parallel_to(&other.line())
    }

    #[must_use]
    pub fn is_parallel_to_line(&self, line: &Line) -> bool {
        !self.is_null() && self.line().is_parallel_to(line)
    }
}
