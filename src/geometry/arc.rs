use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::{check_range, check_relative_pair, GeometryError, Result};
use crate::math::tolerance::points_equal;
use crate::math::transform::{rotation_about, rotation_angle, scaling_about, translation};
use crate::math::{Extent, Point2, Similarity2, Tolerance, ToleranceConfig, Vector2};

use super::bearing::{Bearing, ANGULAR_EPSILON};
use super::frame::FrameId;
use super::line::Line;
use super::segment::{ExtremityProcessing, Segment};

/// Turning direction of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// A circular arc.
///
/// Stored as center, radius, start bearing and signed sweep (positive is
/// counterclockwise). A sweep of `±2π` is a full circle whose start and
/// end coincide. Zero radius or zero sweep makes a null arc, which is
/// valid but has no length and crosses nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start: Bearing,
    sweep: f64,
    tolerance: Tolerance,
    frame: FrameId,
}

impl Arc {
    fn build(center: Point2, radius: f64, start: Bearing, sweep: f64) -> Self {
        let mut arc = Self {
            center,
            radius,
            start,
            sweep,
            tolerance: Tolerance::default(),
            frame: FrameId::DEFAULT,
        };
        arc.refresh_tolerance();
        arc
    }

    /// Arc through three points, turning from `start` through `middle` to `end`.
    ///
    /// When `start` equals `end` the result is the full circle of diameter
    /// `start`-`middle`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` when the points are collinear or
    /// `middle` repeats another point.
    pub fn from_three_points(start: &Point2, middle: &Point2, end: &Point2) -> Result<Self> {
        let tol = Tolerance::auto_from([start, middle, end]).value();
        if points_equal(start, middle, tol) || points_equal(middle, end, tol) {
            return Err(GeometryError::Degenerate("arc points must be distinct".into()).into());
        }
        if points_equal(start, end, tol) {
            let center = nalgebra::center(start, middle);
            let radius = (start - center).norm();
            return Ok(Self::build(center, radius, bearing_from(&center, start), TAU));
        }

        let ab = middle - start;
        let ac = end - start;
        let cross = ab.x * ac.y - ab.y * ac.x;
        if cross.abs() <= tol * ab.norm().max(ac.norm()) {
            return Err(GeometryError::Degenerate("arc points are collinear".into()).into());
        }

        // Circumcenter relative to `start`.
        let (b2, c2) = (ab.norm_squared(), ac.norm_squared());
        let offset = Vector2::new(ac.y * b2 - ab.y * c2, ab.x * c2 - ac.x * b2) / (2.0 * cross);
        let center = start + offset;
        let radius = offset.norm();

        let from = bearing_from(&center, start);
        let to = bearing_from(&center, end);
        let sweep = if cross > 0.0 { to - from } else { -(from - to) };
        Ok(Self::build(center, radius, from, sweep))
    }

    /// Arc of the circle `(center, radius)` from bearing `start` to bearing `end`.
    ///
    /// Equal bearings give a full circle.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` for a negative or
    /// non-finite radius.
    pub fn from_center_bearings(
        center: Point2,
        start: Bearing,
        end: Bearing,
        radius: f64,
        direction: RotationDirection,
    ) -> Result<Self> {
        check_range("radius", radius, 0.0, f64::MAX)?;
        let full = start.is_equal_to(&end, ANGULAR_EPSILON);
        let sweep = match (direction, full) {
            (RotationDirection::CounterClockwise, true) => TAU,
            (RotationDirection::Clockwise, true) => -TAU,
            (RotationDirection::CounterClockwise, false) => end - start,
            (RotationDirection::Clockwise, false) => -(start - end),
        };
        Ok(Self::build(center, radius, start, sweep))
    }

    /// Arc of the circle `(center, radius)` from bearing `start`, turning `sweep` radians.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` when `|sweep| > 2π` or
    /// the radius is negative or non-finite.
    pub fn from_center_sweep(center: Point2, start: Bearing, sweep: f64, radius: f64) -> Result<Self> {
        check_range("radius", radius, 0.0, f64::MAX)?;
        check_range("sweep", sweep, -TAU - ANGULAR_EPSILON, TAU + ANGULAR_EPSILON)?;
        Ok(Self::build(center, radius, start, sweep.clamp(-TAU, TAU)))
    }

    #[must_use]
    pub fn with_frame(mut self, frame: FrameId) -> Self {
        self.frame = frame;
        self
    }

    /// Derives the auto tolerance with `config` from now on.
    #[must_use]
    pub fn with_tolerance_config(mut self, config: ToleranceConfig) -> Self {
        let points = self.defining_points();
        self.tolerance.set_config(config, &points);
        self
    }

    #[must_use]
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn direction(&self) -> RotationDirection {
        if self.sweep < 0.0 {
            RotationDirection::Clockwise
        } else {
            RotationDirection::CounterClockwise
        }
    }

    #[must_use]
    pub fn start_bearing(&self) -> Bearing {
        self.start
    }

    #[must_use]
    pub fn end_bearing(&self) -> Bearing {
        self.start + self.sweep
    }

    /// Signed sweep in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.point_at_bearing(&self.start)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        if self.is_full_circle() {
            return self.start_point();
        }
        self.point_at_bearing(&self.end_bearing())
    }

    fn point_at_bearing(&self, bearing: &Bearing) -> Point2 {
        self.center + bearing.unit_vector() * self.radius
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance.value()
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance.fix(tolerance);
    }

    pub fn set_auto_tolerance(&mut self) {
        let points = self.defining_points();
        self.tolerance.make_auto(&points);
    }

    fn refresh_tolerance(&mut self) {
        let points = self.defining_points();
        self.tolerance.refresh(&points);
    }

    fn defining_points(&self) -> [Point2; 3] {
        [self.center, self.start_point(), self.end_point()]
    }

    /// Zero radius or zero length within tolerance.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.radius <= self.tolerance() || self.length() <= self.tolerance()
    }

    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.sweep.abs() >= TAU - ANGULAR_EPSILON
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Bounding box, including the cardinal points the sweep passes.
    #[must_use]
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::from_corners(&self.start_point(), &self.end_point());
        for k in 0..4_i32 {
            let cardinal = Bearing::from_angle(f64::from(k) * FRAC_PI_2);
            if self.start.is_bearing_within_sweep(self.sweep, &cardinal) {
                extent.add_point(&self.point_at_bearing(&cardinal));
            }
        }
        extent
    }

    /// Angular slack matching the linear tolerance on this radius.
    fn angular_tolerance(&self, tol: f64) -> f64 {
        if self.radius > 0.0 {
            (tol / self.radius).max(ANGULAR_EPSILON)
        } else {
            ANGULAR_EPSILON
        }
    }

    /// Point at relative position `t`: the start rotated by `t * sweep`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= t <= 1`.
    pub fn relative_point(&self, t: f64) -> Result<Point2> {
        check_range("relative_position", t, 0.0, 1.0)?;
        Ok(self.point_at_bearing(&(self.start + t * self.sweep)))
    }

    /// Relative position of `p`, measured by the angle turned from the start.
    ///
    /// `p` is expected on the arc; the result is not clamped.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a null arc.
    pub fn relative_position(&self, p: &Point2) -> Result<f64> {
        if self.is_null() {
            return Err(GeometryError::Degenerate("relative position on a null arc".into()).into());
        }
        let bearing = bearing_from(&self.center, p);
        let turned = self.turned_to(&bearing);
        let slack = self.angular_tolerance(self.tolerance());
        // Just before the start counts as the start.
        if turned > self.sweep.abs() + slack && TAU - turned <= slack {
            return Ok(0.0);
        }
        Ok(turned / self.sweep.abs())
    }

    /// Angle in `[0, 2π)` turned from the start to `bearing`, in the arc's direction.
    fn turned_to(&self, bearing: &Bearing) -> f64 {
        if self.sweep < 0.0 {
            self.start - *bearing
        } else {
            *bearing - self.start
        }
    }

    /// Point of the arc closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Point2 {
        if points_equal(p, &self.center, self.tolerance()) {
            return self.start_point();
        }
        let bearing = bearing_from(&self.center, p);
        if self.start.is_bearing_within_sweep(self.sweep, &bearing) {
            return self.point_at_bearing(&bearing);
        }
        let (a, b) = (self.start_point(), self.end_point());
        if (p - a).norm_squared() <= (p - b).norm_squared() {
            a
        } else {
            b
        }
    }

    #[must_use]
    pub fn shortest_distance(&self, p: &Point2) -> f64 {
        (p - self.closest_point(p)).norm()
    }

    /// Tangent bearing at the point of the arc closest to `p`, in the travel direction.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a null arc.
    pub fn bearing_at(&self, p: &Point2) -> Result<Bearing> {
        if self.is_null() {
            return Err(GeometryError::Degenerate("bearing of a null arc".into()).into());
        }
        let radial = bearing_from(&self.center, &self.closest_point(p));
        Ok(match self.direction() {
            RotationDirection::CounterClockwise => radial + FRAC_PI_2,
            RotationDirection::Clockwise => radial - FRAC_PI_2,
        })
    }

    /// Distance to the center equals the radius within `tol`.
    #[must_use]
    pub fn is_point_on_circle(&self, p: &Point2, tol: Option<f64>) -> bool {
        let tol = self.tolerance.or_override(tol);
        ((p - self.center).norm() - self.radius).abs() <= tol
    }

    /// On the supporting circle and within the sweep.
    #[must_use]
    pub fn is_point_on_circle_on_arc(&self, p: &Point2, tol: Option<f64>) -> bool {
        let tol = self.tolerance.or_override(tol);
        if !self.is_point_on_circle(p, Some(tol)) {
            return false;
        }
        if self.radius <= tol {
            return true;
        }
        let bearing = bearing_from(&self.center, p);
        self.start
            .is_bearing_within_sweep_tol(self.sweep, &bearing, self.angular_tolerance(tol))
    }

    /// A full circle has no extremities to exclude.
    #[must_use]
    pub fn is_point_on(&self, p: &Point2, extremity: ExtremityProcessing, tol: Option<f64>) -> bool {
        let tol = self.tolerance.or_override(tol);
        if extremity == ExtremityProcessing::Exclude
            && !self.is_full_circle()
            && (points_equal(p, &self.start_point(), tol) || points_equal(p, &self.end_point(), tol))
        {
            return false;
        }
        self.is_point_on_circle_on_arc(p, Some(tol))
    }

    /// Crossing points with a line, filtered to the sweep.
    #[must_use]
    pub fn intersect_line(&self, line: &Line) -> Vec<Point2> {
        if self.is_null() {
            return Vec::new();
        }
        let tol = self.tolerance().max(line.tolerance());
        let foot = line.closest_point(&self.center);
        let dist = (foot - self.center).norm();
        if dist > self.radius + tol {
            return Vec::new();
        }
        let half_chord = (self.radius * self.radius - dist * dist).max(0.0).sqrt();
        let candidates = if half_chord <= tol {
            // Tangent: single root.
            vec![foot]
        } else {
            let along = line.direction() * half_chord;
            vec![foot - along, foot + along]
        };
        candidates
            .into_iter()
            .filter(|p| self.is_point_on_circle_on_arc(p, Some(tol)))
            .collect()
    }

    /// Crossing points with a segment.
    #[must_use]
    pub fn intersect_segment(&self, segment: &Segment) -> Vec<Point2> {
        let tol = self.tolerance().max(segment.tolerance());
        if segment.is_null() || !self.extent().overlaps(&segment.extent(), tol) {
            return Vec::new();
        }
        self.intersect_line(&segment.line())
            .into_iter()
            .filter(|p| segment.is_point_on(p, ExtremityProcessing::Include, Some(tol)))
            .collect()
    }

    /// Crossing points with another arc. Concentric arcs give none.
    #[must_use]
    pub fn intersect_arc(&self, other: &Arc) -> Vec<Point2> {
        if self.is_null() || other.is_null() {
            return Vec::new();
        }
        let tol = self.tolerance().max(other.tolerance());
        let d = other.center - self.center;
        let dist = d.norm();
        if dist <= tol {
            return Vec::new();
        }
        let (r1, r2) = (self.radius, other.radius);
        if dist > r1 + r2 + tol || dist < (r1 - r2).abs() - tol {
            return Vec::new();
        }

        // Distance from our center along d to the radical line.
        let a = (r1 * r1 - r2 * r2 + dist * dist) / (2.0 * dist);
        let h = (r1 * r1 - a * a).max(0.0).sqrt();
        let unit = d / dist;
        let mid = self.center + unit * a;
        let perp = Vector2::new(-unit.y, unit.x);

        let candidates = if h <= tol {
            vec![mid]
        } else {
            vec![mid + perp * h, mid - perp * h]
        };
        candidates
            .into_iter()
            .filter(|p| {
                self.is_point_on_circle_on_arc(p, Some(tol))
                    && other.is_point_on_circle_on_arc(p, Some(tol))
            })
            .collect()
    }

    /// Keeps the part between relative positions `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `ParameterOutOfRange` unless `0 <= start <= end <= 1`.
    pub fn shorten(&mut self, start: f64, end: f64) -> Result<()> {
        check_relative_pair(start, end)?;
        self.start = self.start + start * self.sweep;
        self.sweep *= end - start;
        self.refresh_tolerance();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotOnLinear` when a point is off the arc, or
    /// `ParameterOutOfRange` when `a` comes after `b`.
    pub fn shorten_points(&mut self, a: &Point2, b: &Point2) -> Result<()> {
        let s = self.position_of(a)?;
        let e = self.position_of(b)?;
        self.shorten(s, e)
    }

    /// # Errors
    ///
    /// Returns `NotOnLinear` when `p` is off the arc.
    pub fn shorten_to(&mut self, p: &Point2) -> Result<()> {
        let e = self.position_of(p)?;
        self.shorten(0.0, e)
    }

    /// # Errors
    ///
    /// Returns `NotOnLinear` when `p` is off the arc.
    pub fn shorten_from(&mut self, p: &Point2) -> Result<()> {
        let s = self.position_of(p)?;
        self.shorten(s, 1.0)
    }

    /// # Errors
    ///
    /// Returns `ParameterOutOfRange` unless `0 <= end <= 1`.
    pub fn shorten_to_relative(&mut self, end: f64) -> Result<()> {
        self.shorten(0.0, end)
    }

    /// # Errors
    ///
    /// Returns `ParameterOutOfRange` unless `0 <= start <= 1`.
    pub fn shorten_from_relative(&mut self, start: f64) -> Result<()> {
        self.shorten(start, 1.0)
    }

    fn position_of(&self, p: &Point2) -> Result<f64> {
        if !self.is_point_on(p, ExtremityProcessing::Include, None) {
            return Err(GeometryError::NotOnLinear.into());
        }
        Ok(self.relative_position(p)?.clamp(0.0, 1.0))
    }

    pub fn reverse(&mut self) {
        self.start = self.end_bearing();
        self.sweep = -self.sweep;
    }

    pub(crate) fn transform(&mut self, sim: &Similarity2) {
        self.center = sim.transform_point(&self.center);
        self.radius *= sim.scaling();
        self.start = self.start + rotation_angle(sim);
        self.refresh_tolerance();
    }

    pub fn rotate(&mut self, angle: f64, origin: &Point2) {
        self.transform(&rotation_about(angle, origin));
    }

    pub fn translate(&mut self, displacement: &Vector2) {
        self.transform(&translation(displacement));
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a zero or non-finite factor.
    pub fn scale(&mut self, factor: f64, origin: &Point2) -> Result<()> {
        self.transform(&scaling_about(factor, origin)?);
        Ok(())
    }
}

fn bearing_from(center: &Point2, p: &Point2) -> Bearing {
    let d = p - center;
    Bearing::from_displacement(d.x, d.y)
}
