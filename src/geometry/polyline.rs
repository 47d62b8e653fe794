use crate::error::{check_range, check_relative_pair, GeometryError, Result};
use crate::math::tolerance::points_equal;
use crate::math::transform::{rotation_about, scaling_about, translation};
use crate::math::{Extent, Point2, Similarity2, Tolerance, ToleranceConfig, Vector2};
use crate::operations::modification::{RemoveNeedles, SplitAutoCrossing};
use crate::operations::offset::ParallelCopy;
use crate::operations::query::self_intersect;

use super::bearing::Bearing;
use super::frame::FrameId;
use super::line::Line;
use super::segment::{ExtremityProcessing, Segment, Side};

/// A chain of straight legs through an ordered list of vertices.
///
/// The extent is cached and kept current by every mutating method:
/// [`Polyline::append_point`] grows it in constant time, the other
/// mutations rescan the vertices once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    points: Vec<Point2>,
    tolerance: Tolerance,
    frame: FrameId,
    extent: Option<Extent>,
}

impl Polyline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut polyline = Self::new();
        polyline.replace_points(points.into_iter().collect());
        polyline
    }

    #[must_use]
    pub fn with_frame(mut self, frame: FrameId) -> Self {
        self.frame = frame;
        self
    }

    /// Derives the auto tolerance with `config` from now on.
    #[must_use]
    pub fn with_tolerance_config(mut self, config: ToleranceConfig) -> Self {
        self.tolerance.set_config(config, &self.points);
        self
    }

    #[must_use]
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Replaces every vertex and rebuilds the cached state.
    pub(crate) fn replace_points(&mut self, points: Vec<Point2>) {
        self.points = points;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.extent = Extent::from_points(&self.points);
        self.tolerance.refresh(&self.points);
    }

    pub fn append_point(&mut self, p: Point2) {
        match &mut self.extent {
            Some(extent) => extent.add_point(&p),
            None => self.extent = Some(Extent::from_corners(&p, &p)),
        }
        self.tolerance.include(&p);
        self.points.push(p);
    }

    /// Inserts `p` before the vertex at `index` (`index == len` appends).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` when `index > len`.
    pub fn insert_point(&mut self, index: usize, p: Point2) -> Result<()> {
        Self::check_index(index, self.points.len())?;
        self.points.insert(index, p);
        self.invalidate();
        Ok(())
    }

    /// Removes and returns the vertex at `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` when `index >= len`.
    pub fn remove_point(&mut self, index: usize) -> Result<Point2> {
        if self.points.is_empty() {
            return Err(GeometryError::Degenerate("remove from an empty polyline".into()).into());
        }
        Self::check_index(index, self.points.len() - 1)?;
        let p = self.points.remove(index);
        self.invalidate();
        Ok(p)
    }

    #[allow(clippy::cast_precision_loss)]
    fn check_index(index: usize, max: usize) -> Result<()> {
        check_range("index", index as f64, 0.0, max as f64)
    }

    pub fn make_empty(&mut self) {
        self.replace_points(Vec::new());
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.points.first().copied()
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        self.points.last().copied()
    }

    /// At least three vertices and the last one equals the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 3 => {
                points_equal(first, last, self.tolerance())
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance.value()
    }

    #[must_use]
    pub fn is_auto_tolerance(&self) -> bool {
        self.tolerance.is_auto()
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance.fix(tolerance);
    }

    pub fn set_auto_tolerance(&mut self) {
        self.tolerance.make_auto(&self.points);
    }

    /// Cached bounding box, `None` when empty.
    #[must_use]
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Leg `i`, from vertex `i` to vertex `i + 1`.
    #[must_use]
    pub fn segment(&self, i: usize) -> Option<Segment> {
        let (start, end) = (self.points.get(i)?, self.points.get(i + 1)?);
        let mut segment = Segment::new(*start, *end).with_frame(self.frame);
        segment.set_tolerance(self.tolerance());
        Some(segment)
    }

    /// Every leg in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).filter_map(move |i| self.segment(i))
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Leg index and point at curvilinear distance `distance` from the start.
    fn locate(&self, distance: f64) -> Option<(usize, Point2)> {
        let mut walked = 0.0;
        for (i, w) in self.points.windows(2).enumerate() {
            let leg = (w[1] - w[0]).norm();
            if distance <= walked + leg {
                let p = if leg > 0.0 {
                    w[0] + (w[1] - w[0]) * ((distance - walked) / leg).clamp(0.0, 1.0)
                } else {
                    w[0]
                };
                return Some((i, p));
            }
            walked += leg;
        }
        let last = self.points.last()?;
        Some((self.segment_count().saturating_sub(1), *last))
    }

    fn non_empty(&self) -> Result<()> {
        if self.points.is_empty() {
            Err(GeometryError::Degenerate("empty polyline".into()).into())
        } else {
            Ok(())
        }
    }

    /// Point at relative position `t` of the total length.
    ///
    /// # Errors
    ///
    /// Returns `ParameterOutOfRange` unless `0 <= t <= 1`, or `Degenerate`
    /// for an empty polyline.
    pub fn relative_point(&self, t: f64) -> Result<Point2> {
        check_range("relative_position", t, 0.0, 1.0)?;
        self.non_empty()?;
        let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
        if t == 0.0 {
            return Ok(first);
        }
        if t == 1.0 {
            return Ok(last);
        }
        Ok(self.locate(t * self.length()).map_or(last, |(_, p)| p))
    }

    /// Relative position of `p`, measured on the first leg that holds it.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when `p` is off the polyline, or
    /// `Degenerate` when the polyline has no length.
    pub fn relative_position(&self, p: &Point2) -> Result<f64> {
        let total = self.length();
        if total <= 0.0 {
            return Err(
                GeometryError::Degenerate("relative position on a zero-length polyline".into())
                    .into(),
            );
        }
        let mut walked = 0.0;
        for leg in self.segments() {
            if leg.is_point_on(p, ExtremityProcessing::Include, None) {
                let along = (p - leg.start_point()).norm().min(leg.length());
                return Ok(((walked + along) / total).clamp(0.0, 1.0));
            }
            walked += leg.length();
        }
        Err(GeometryError::NotOnLinear.into())
    }

    fn closest_leg(&self, p: &Point2) -> Option<(usize, Point2)> {
        self.segments()
            .enumerate()
            .map(|(i, leg)| (i, leg.closest_point(p)))
            .min_by(|a, b| (p - a.1).norm_squared().total_cmp(&(p - b.1).norm_squared()))
    }

    /// Point of the polyline closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Point2) -> Option<Point2> {
        if self.points.len() == 1 {
            return self.start_point();
        }
        self.closest_leg(p).map(|(_, q)| q)
    }

    /// Leg closest to `p`.
    #[must_use]
    pub fn closest_segment(&self, p: &Point2) -> Option<Segment> {
        self.closest_leg(p).and_then(|(i, _)| self.segment(i))
    }

    /// Whether `p` lies on the polyline.
    ///
    /// Interior vertices are always on; `extremity` only governs the first
    /// and last vertex.
    #[must_use]
    pub fn is_point_on(&self, p: &Point2, extremity: ExtremityProcessing, tol: Option<f64>) -> bool {
        let tol = self.tolerance.or_override(tol);
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return false;
        };
        if extremity == ExtremityProcessing::Exclude
            && (points_equal(p, first, tol) || points_equal(p, last, tol))
        {
            return false;
        }
        if let Some(extent) = &self.extent {
            if !extent.contains_point(p, tol) {
                return false;
            }
        }
        if self.points.len() == 1 {
            return points_equal(p, first, tol);
        }
        self.segments()
            .any(|leg| leg.is_point_on(p, ExtremityProcessing::Include, Some(tol)))
    }

    /// Keeps the part between relative positions `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `ParameterOutOfRange` unless `0 <= start <= end <= 1`, or
    /// `Degenerate` for an empty polyline.
    pub fn shorten(&mut self, start: f64, end: f64) -> Result<()> {
        check_relative_pair(start, end)?;
        self.non_empty()?;
        let total = self.length();
        let (Some((i0, p0)), Some((i1, p1))) =
            (self.locate(start * total), self.locate(end * total))
        else {
            return Ok(());
        };
        let tol = self.tolerance();
        let mut kept = vec![p0];
        for vertex in self.points.iter().take(i1 + 1).skip(i0 + 1) {
            if !points_equal(vertex, kept.last().unwrap_or(&p0), tol) {
                kept.push(*vertex);
            }
        }
        if kept.len() == 1 || !points_equal(&p1, &kept[kept.len() - 1], tol) {
            kept.push(p1);
        }
        self.replace_points(kept);
        Ok(())
    }

    /// Keeps the part between two points of the polyline.
    ///
    /// # Errors
    ///
    /// Returns `NotOnLinear` when a point is off the polyline, or
    /// `ParameterOutOfRange` when `a` comes after `b`.
    pub fn shorten_points(&mut self, a: &Point2, b: &Point2) -> Result<()> {
        let s = self.relative_position(a)?;
        let e = self.relative_position(b)?;
        self.shorten(s, e)
    }

    /// # Errors
    ///
    /// Returns `NotOnLinear` when `p` is off the polyline.
    pub fn shorten_to(&mut self, p: &Point2) -> Result<()> {
        let e = self.relative_position(p)?;
        self.shorten(0.0, e)
    }

    /// # Errors
    ///
    /// Returns `NotOnLinear` when `p` is off the polyline.
    pub fn shorten_from(&mut self, p: &Point2) -> Result<()> {
        let s = self.relative_position(p)?;
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

    pub(crate) fn transform(&mut self, sim: &Similarity2) {
        for p in &mut self.points {
            *p = sim.transform_point(p);
        }
        self.invalidate();
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

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    // Interaction with other linears

    /// Indices of the vertices where `self` passes through `segment`'s interior.
    ///
    /// A vertex counts when it lies strictly inside `segment` and its two
    /// neighbours are on opposite sides of it. The closing vertex of a
    /// closed polyline is reported as index 0, with the last and second
    /// vertices as neighbours.
    pub(crate) fn crossing_vertices(&self, segment: &Segment) -> Vec<usize> {
        let tol = self.tolerance().max(segment.tolerance());
        let n = self.points.len();
        if segment.is_null() || n < 3 {
            return Vec::new();
        }
        let d = segment.end_point() - segment.start_point();
        let len = d.norm();
        let side = |p: &Point2| {
            let v = p - segment.start_point();
            (d.x * v.y - d.y * v.x) / len
        };
        let crosses_at = |before: &Point2, vertex: &Point2, after: &Point2| {
            if !segment.is_point_on(vertex, ExtremityProcessing::Exclude, Some(tol)) {
                return false;
            }
            let (b, a) = (side(before), side(after));
            (b > tol && a < -tol) || (b < -tol && a > tol)
        };

        let mut found: Vec<usize> = (1..n - 1)
            .filter(|&k| crosses_at(&self.points[k - 1], &self.points[k], &self.points[k + 1]))
            .collect();
        if self.is_closed() && crosses_at(&self.points[n - 2], &self.points[0], &self.points[1]) {
            found.insert(0, 0);
        }
        found
    }

    fn vertex_crossings(&self, segment: &Segment) -> Vec<Point2> {
        self.crossing_vertices(segment)
            .into_iter()
            .map(|k| self.points[k])
            .collect()
    }

    /// Crossing points with `segment`, deduplicated.
    #[must_use]
    pub fn intersect_segment(&self, segment: &Segment) -> Vec<Point2> {
        let tol = self.tolerance().max(segment.tolerance());
        let mut found = Vec::new();
        let overlaps = self
            .extent
            .is_some_and(|e| e.overlaps(&segment.extent(), tol));
        if !overlaps {
            return found;
        }
        for leg in self.segments() {
            if let Some(p) = leg.intersect_segment(segment).point() {
                push_unique(&mut found, p, tol);
            }
        }
        for p in self.vertex_crossings(segment) {
            push_unique(&mut found, p, tol);
        }
        found
    }

    /// Crossing points with `other`, deduplicated.
    #[must_use]
    pub fn intersect_polyline(&self, other: &Polyline) -> Vec<Point2> {
        let tol = self.tolerance().max(other.tolerance());
        let mut found = Vec::new();
        let overlaps = match (&self.extent, &other.extent) {
            (Some(a), Some(b)) => a.overlaps(b, tol),
            _ => false,
        };
        if !overlaps {
            return found;
        }
        for leg in other.segments() {
            for p in self.intersect_segment(&leg) {
                push_unique(&mut found, p, tol);
            }
        }
        for leg in self.segments() {
            for p in other.vertex_crossings(&leg) {
                push_unique(&mut found, p, tol);
            }
        }
        found
    }

    #[must_use]
    pub fn crosses_segment(&self, segment: &Segment) -> bool {
        !self.intersect_segment(segment).is_empty()
    }

    #[must_use]
    pub fn crosses_polyline(&self, other: &Polyline) -> bool {
        !self.intersect_polyline(other).is_empty()
    }

    #[must_use]
    pub fn is_contiguous_to_segment(&self, segment: &Segment) -> bool {
        self.segments().any(|leg| leg.is_contiguous_to(segment))
    }

    #[must_use]
    pub fn is_contiguous_to_polyline(&self, other: &Polyline) -> bool {
        other.segments().any(|leg| self.is_contiguous_to_segment(&leg))
    }

    /// Runs shared with `segment`, ordered along `self`.
    ///
    /// A run continuing over a vertex of `self` is reported once.
    #[must_use]
    pub fn contiguousness_points_with_segment(&self, segment: &Segment) -> Vec<(Point2, Point2)> {
        let tol = self.tolerance().max(segment.tolerance());
        let mut runs = Vec::new();
        for leg in self.segments() {
            if let Some(run) = leg.contiguousness_points(segment) {
                push_run(&mut runs, run, tol);
            }
        }
        runs
    }

    /// Runs shared with `other`, ordered along `self`.
    #[must_use]
    pub fn contiguousness_points_with_polyline(&self, other: &Polyline) -> Vec<(Point2, Point2)> {
        let tol = self.tolerance().max(other.tolerance());
        let mut runs = Vec::new();
        for leg in self.segments() {
            let mut on_leg: Vec<(f64, (Point2, Point2))> = other
                .segments()
                .filter_map(|theirs| leg.contiguousness_points(&theirs))
                .map(|run| ((run.0 - leg.start_point()).norm(), run))
                .collect();
            on_leg.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (_, run) in on_leg {
                push_run(&mut runs, run, tol);
            }
        }
        runs
    }

    #[must_use]
    pub fn is_adjacent_to_segment(&self, segment: &Segment) -> bool {
        self.segments().any(|leg| leg.is_adjacent_to(segment))
    }

    #[must_use]
    pub fn is_adjacent_to_polyline(&self, other: &Polyline) -> bool {
        other.segments().any(|leg| self.is_adjacent_to_segment(&leg))
    }

    // Self relations

    /// Points where two non-consecutive legs cross, deduplicated.
    #[must_use]
    pub fn auto_intersect(&self) -> Vec<Point2> {
        let tol = self.tolerance();
        let mut found = Vec::new();
        for hit in self_intersect::find_all(self) {
            push_unique(&mut found, hit.point, tol);
        }
        found
    }

    #[must_use]
    pub fn auto_crosses(&self) -> bool {
        !self_intersect::find_all(self).is_empty()
    }

    /// Some pair of legs shares a run longer than the tolerance.
    #[must_use]
    pub fn is_auto_contiguous(&self) -> bool {
        let legs: Vec<Segment> = self.segments().collect();
        legs.iter().enumerate().any(|(i, a)| {
            legs[i + 1..].iter().any(|b| a.is_contiguous_to(b))
        })
    }

    /// Cuts the polyline at every self crossing.
    ///
    /// With `process_closed`, the pieces of a closed polyline are chained
    /// back into closed loops.
    ///
    /// # Errors
    ///
    /// See [`SplitAutoCrossing::execute`].
    pub fn split_into_non_auto_crossing(&self, process_closed: bool) -> Result<Vec<Polyline>> {
        SplitAutoCrossing::new(self).closed(process_closed).execute()
    }

    /// Copy of the polyline at `offset` on `side`, with mitred joins.
    ///
    /// # Errors
    ///
    /// See [`ParallelCopy::execute`].
    pub fn parallel_copy(
        &self,
        offset: f64,
        side: Side,
        first_alignment: Option<&Line>,
        last_alignment: Option<&Line>,
    ) -> Result<Polyline> {
        let mut op = ParallelCopy::new(self, offset, side);
        if let Some(line) = first_alignment {
            op = op.first_alignment(*line);
        }
        if let Some(line) = last_alignment {
            op = op.last_alignment(*line);
        }
        op.execute()
    }

    /// Removes vertices that make the polyline fold back on itself.
    ///
    /// Returns the number of removed vertices.
    ///
    /// # Errors
    ///
    /// See [`RemoveNeedles::execute`].
    pub fn remove_auto_contiguous_needles(&mut self, process_closed: bool) -> Result<usize> {
        RemoveNeedles::new(self).closed(process_closed).execute()
    }

    // Measures

    /// Sum of the legs' ray areas seen from `ray_origin`.
    #[must_use]
    pub fn ray_area(&self, ray_origin: &Point2) -> f64 {
        self.segments().map(|leg| leg.ray_area(ray_origin)).sum()
    }

    /// Signed enclosed area, positive when counterclockwise.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` when the polyline is not closed.
    pub fn area(&self) -> Result<f64> {
        if !self.is_closed() {
            return Err(GeometryError::Degenerate("area of an open polyline".into()).into());
        }
        Ok(self.ray_area(&self.points[0]))
    }

    /// Bearing of the first non-null leg.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` when every leg is null.
    pub fn bearing_at_start(&self) -> Result<Bearing> {
        self.segments()
            .find(|leg| !leg.is_null())
            .ok_or_else(|| GeometryError::Degenerate("polyline has no direction".into()))?
            .bearing()
    }

    /// Bearing of the last non-null leg.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` when every leg is null.
    pub fn bearing_at_end(&self) -> Result<Bearing> {
        let legs: Vec<Segment> = self.segments().collect();
        legs.into_iter()
            .rev()
            .find(|leg| !leg.is_null())
            .ok_or_else(|| GeometryError::Degenerate("polyline has no direction".into()))?
            .bearing()
    }

    /// Moves the first vertex to `p`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for an empty polyline.
    pub fn adjust_start_point_to(&mut self, p: Point2) -> Result<()> {
        self.non_empty()?;
        self.points[0] = p;
        self.invalidate();
        Ok(())
    }

    /// Moves the last vertex to `p`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for an empty polyline.
    pub fn adjust_end_point_to(&mut self, p: Point2) -> Result<()> {
        self.non_empty()?;
        let last = self.points.len() - 1;
        self.points[last] = p;
        self.invalidate();
        Ok(())
    }

    /// Orders `points` by their relative position along the polyline.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotOnLinear` when a point is off the polyline.
    pub fn sort_points_by_relative_position(&self, points: &[Point2]) -> Result<Vec<Point2>> {
        let mut keyed = points
            .iter()
            .map(|p| self.relative_position(p).map(|t| (t, *p)))
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, p)| p).collect())
    }
}

/// Appends a run, extending the previous one when they join.
fn push_run(runs: &mut Vec<(Point2, Point2)>, run: (Point2, Point2), tol: f64) {
    match runs.last_mut() {
        Some(last) if points_equal(&last.1, &run.0, tol) => last.1 = run.1,
        _ => runs.push(run),
    }
}

/// Pushes `p` unless an equal point is already there.
pub(crate) fn push_unique(points: &mut Vec<Point2>, p: Point2, tol: f64) {
    if !points.iter().any(|q| points_equal(q, &p, tol)) {
        points.push(p);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    fn pl(coords: &[(f64, f64)]) -> Polyline {
        Polyline::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)))
    }

    fn square() -> Polyline {
        pl(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)])
    }

    #[test]
    fn closed_square_length_and_area() {
        let sq = square();
        assert!(sq.is_closed());
        assert_relative_eq!(sq.length(), 20.0);
        assert_relative_eq!(sq.area().unwrap(), 25.0);
        let mut cw = sq.clone();
        cw.reverse();
        assert_relative_eq!(cw.area().unwrap(), -25.0);
        assert!(pl(&[(0.0, 0.0), (1.0, 0.0)]).area().is_err());
    }

    #[test]
    fn extent_is_kept_current() {
        let mut p = Polyline::new();
        assert!(p.extent().is_none());
        p.append_point(Point2::new(1.0, 1.0));
        p.append_point(Point2::new(-2.0, 4.0));
        let e = p.extent().unwrap();
        assert_eq!((e.x_min, e.y_min, e.x_max, e.y_max), (-2.0, 1.0, 1.0, 4.0));

        p.insert_point(1, Point2::new(0.0, 9.0)).unwrap();
        assert_eq!(p.extent().unwrap().y_max, 9.0);

        p.remove_point(1).unwrap();
        assert_eq!(p.extent().unwrap().y_max, 4.0);

        p.translate(&Vector2::new(10.0, 0.0));
        assert_eq!(p.extent().unwrap().x_min, 8.0);

        p.make_empty();
        assert!(p.extent().is_none());
    }

    #[test]
    fn vertex_editing_bounds() {
        let mut p = pl(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(p.insert_point(3, Point2::origin()).is_err());
        assert!(p.insert_point(2, Point2::new(2.0, 0.0)).is_ok());
        assert!(p.remove_point(3).is_err());
        assert_eq!(p.remove_point(0).unwrap(), Point2::new(0.0, 0.0));
        assert_eq!(p.len(), 2);
        assert!(Polyline::new().remove_point(0).is_err());
    }

    #[test]
    fn append_keeps_auto_tolerance() {
        let mut p = pl(&[(0.0, 0.0)]);
        p.append_point(Point2::new(1.0e7, 0.0));
        assert_relative_eq!(p.tolerance(), 1.0e-5, max_relative = 1e-9);
    }

    #[test]
    fn relative_point_walks_lengths() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(p.relative_point(0.0).unwrap(), Point2::new(0.0, 0.0));
        assert_eq!(p.relative_point(1.0).unwrap(), Point2::new(10.0, 10.0));
        let q = p.relative_point(0.75).unwrap();
        assert_relative_eq!(q.x, 10.0);
        assert_relative_eq!(q.y, 5.0);
        assert!(p.relative_point(1.2).is_err());
        assert!(Polyline::new().relative_point(0.5).is_err());
    }

    #[test]
    fn relative_position_round_trip() {
        let p = pl(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0), (-1.0, 10.0)]);
        for &t in &[0.0, 0.2, 0.5, 0.8, 1.0] {
            let q = p.relative_point(t).unwrap();
            assert_relative_eq!(p.relative_position(&q).unwrap(), t, epsilon = 1e-9);
        }
        assert!(p.relative_position(&Point2::new(50.0, 50.0)).is_err());
    }

    #[test]
    fn point_on_interior_vertex() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert!(p.is_point_on(&Point2::new(10.0, 0.0), ExtremityProcessing::Exclude, None));
        assert!(!p.is_point_on(&Point2::new(0.0, 0.0), ExtremityProcessing::Exclude, None));
        assert!(p.is_point_on(&Point2::new(0.0, 0.0), ExtremityProcessing::Include, None));
        assert!(p.is_point_on(&Point2::new(10.0, 4.0), ExtremityProcessing::Include, None));
        assert!(!p.is_point_on(&Point2::new(5.0, 5.0), ExtremityProcessing::Include, None));
    }

    #[test]
    fn closest_point_and_segment() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let q = p.closest_point(&Point2::new(12.0, 6.0)).unwrap();
        assert_relative_eq!(q.x, 10.0);
        assert_relative_eq!(q.y, 6.0);
        let leg = p.closest_segment(&Point2::new(3.0, -1.0)).unwrap();
        assert_eq!(leg.end_point(), Point2::new(10.0, 0.0));
    }

    #[test]
    fn shorten_across_vertices() {
        let mut p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        p.shorten(0.25, 0.75).unwrap();
        assert_eq!(p.len(), 3);
        assert_relative_eq!(p.points()[0].x, 5.0);
        assert_eq!(p.points()[1], Point2::new(10.0, 0.0));
        assert_relative_eq!(p.points()[2].y, 5.0);
        assert_relative_eq!(p.length(), 10.0);
    }

    #[test]
    fn shorten_at_vertex_does_not_duplicate() {
        let mut p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        p.shorten_from(&Point2::new(10.0, 0.0)).unwrap();
        assert_eq!(p.len(), 3);
        p.shorten_to(&Point2::new(10.0, 10.0)).unwrap();
        assert_eq!(p.len(), 2);
        assert_relative_eq!(p.length(), 10.0);
    }

    #[test]
    fn shorten_preconditions() {
        let mut p = pl(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(p.shorten(0.6, 0.4).is_err());
        assert!(p.shorten_to_relative(1.1).is_err());
        assert!(p.shorten_from_relative(-0.1).is_err());
        assert!(p
            .shorten_points(&Point2::new(8.0, 0.0), &Point2::new(2.0, 0.0))
            .is_err());
        p.shorten_points(&Point2::new(2.0, 0.0), &Point2::new(8.0, 0.0)).unwrap();
        assert_relative_eq!(p.length(), 6.0);
    }

    #[test]
    fn crossing_other_linears() {
        let sq = square();
        let through = Segment::new(Point2::new(-1.0, 2.0), Point2::new(6.0, 2.0));
        let hits = sq.intersect_segment(&through);
        assert_eq!(hits.len(), 2);
        assert!(sq.crosses_segment(&through));

        let zigzag = pl(&[(-1.0, 1.0), (6.0, 1.0), (6.0, 4.0), (-1.0, 4.0)]);
        assert_eq!(sq.intersect_polyline(&zigzag).len(), 4);
        assert!(sq.crosses_polyline(&zigzag));

        let outside = Segment::new(Point2::new(10.0, 10.0), Point2::new(20.0, 20.0));
        assert!(sq.intersect_segment(&outside).is_empty());
    }

    #[test]
    fn crossing_through_a_vertex() {
        let vee = pl(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        let horizontal = Segment::new(Point2::new(0.0, 5.0), Point2::new(10.0, 5.0));
        // Tangent at the apex: both neighbours are below.
        assert!(vee.intersect_segment(&horizontal).is_empty());

        let stair = pl(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
        let cross = Segment::new(Point2::new(0.0, 10.0), Point2::new(10.0, 0.0));
        let hits = stair.intersect_segment(&cross);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].x, 5.0);
    }

    #[test]
    fn contiguity_and_adjacency_with_others() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let on_leg = Segment::new(Point2::new(2.0, 0.0), Point2::new(4.0, 0.0));
        assert!(p.is_contiguous_to_segment(&on_leg));
        assert!(p.is_adjacent_to_segment(&on_leg));
        let continuation = Segment::new(Point2::new(10.0, 10.0), Point2::new(10.0, 20.0));
        assert!(!p.is_contiguous_to_segment(&continuation));
        assert!(p.is_adjacent_to_segment(&continuation));

        let other = pl(&[(5.0, -5.0), (5.0, 0.0), (8.0, 0.0)]);
        assert!(p.is_contiguous_to_polyline(&other));
        assert!(p.is_adjacent_to_polyline(&other));
    }

    #[test]
    fn auto_intersections() {
        let bowtie = pl(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]);
        let hits = bowtie.auto_intersect();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].x, 5.0);
        assert_relative_eq!(hits[0].y, 5.0);
        assert!(bowtie.auto_crosses());
        assert!(!square().auto_crosses());
    }

    #[test]
    fn auto_contiguity() {
        let needle = pl(&[(0.0, 0.0), (10.0, 0.0), (5.0, 0.0)]);
        assert!(needle.is_auto_contiguous());
        assert!(!square().is_auto_contiguous());
    }

    #[test]
    fn bearings_at_ends() {
        let p = pl(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_relative_eq!(p.bearing_at_start().unwrap().trigo_value(), 0.0);
        assert_relative_eq!(p.bearing_at_end().unwrap().trigo_value(), FRAC_PI_2);
        assert!(pl(&[(1.0, 1.0)]).bearing_at_start().is_err());
    }

    #[test]
    fn adjust_end_points() {
        let mut p = pl(&[(0.0, 0.0), (10.0, 0.0)]);
        p.adjust_start_point_to(Point2::new(-5.0, 0.0)).unwrap();
        p.adjust_end_point_to(Point2::new(15.0, 0.0)).unwrap();
        assert_relative_eq!(p.length(), 20.0);
        assert_eq!(p.extent().unwrap().x_min, -5.0);
        assert!(Polyline::new().adjust_end_point_to(Point2::origin()).is_err());
    }

    #[test]
    fn sort_points_along() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let sorted = p
            .sort_points_by_relative_position(&[
                Point2::new(10.0, 5.0),
                Point2::new(1.0, 0.0),
                Point2::new(10.0, 0.0),
            ])
            .unwrap();
        assert_eq!(sorted[0], Point2::new(1.0, 0.0));
        assert_eq!(sorted[2], Point2::new(10.0, 5.0));
        assert!(p.sort_points_by_relative_position(&[Point2::new(3.0, 3.0)]).is_err());
    }

    #[test]
    fn frame_is_carried_by_legs() {
        let p = pl(&[(0.0, 0.0), (1.0, 0.0)]).with_frame(FrameId::new(4));
        assert_eq!(p.segment(0).unwrap().frame(), FrameId::new(4));
        assert!(p.segment(1).is_none());
    }

    #[test]
    fn transforms() {
        let mut p = pl(&[(1.0, 0.0), (2.0, 0.0)]);
        p.rotate(FRAC_PI_2, &Point2::origin());
        assert_relative_eq!(p.points()[1].y, 2.0, epsilon = 1e-12);
        p.scale(3.0, &Point2::origin()).unwrap();
        assert_relative_eq!(p.length(), 3.0, epsilon = 1e-12);
        assert!(p.scale(0.0, &Point2::origin()).is_err());
    }

    fn assert_run(run: &(Point2, Point2), from: (f64, f64), to: (f64, f64)) {
        assert_relative_eq!(run.0.x, from.0, epsilon = 1e-12);
        assert_relative_eq!(run.0.y, from.1, epsilon = 1e-12);
        assert_relative_eq!(run.1.x, to.0, epsilon = 1e-12);
        assert_relative_eq!(run.1.y, to.1, epsilon = 1e-12);
    }

    #[test]
    fn contiguous_runs_with_a_segment() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let runs = p.contiguousness_points_with_segment(&Segment::new(
            Point2::new(20.0, 0.0),
            Point2::new(5.0, 0.0),
        ));
        assert_eq!(runs.len(), 1);
        assert_run(&runs[0], (5.0, 0.0), (10.0, 0.0));

        // Collinear legs: one run across the middle vertex.
        let straight = pl(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 5.0)]);
        let runs = straight
            .contiguousness_points_with_segment(&Segment::new(Point2::new(2.0, 0.0), Point2::new(8.0, 0.0)));
        assert_eq!(runs.len(), 1);
        assert_run(&runs[0], (2.0, 0.0), (8.0, 0.0));

        let apart = Segment::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0));
        assert!(p.contiguousness_points_with_segment(&apart).is_empty());
    }

    #[test]
    fn contiguous_runs_with_a_polyline_follow_self() {
        let p = pl(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let other = pl(&[(10.0, 8.0), (10.0, 3.0), (13.0, 3.0), (13.0, 0.0), (3.0, 0.0)]);
        let runs = p.contiguousness_points_with_polyline(&other);
        assert_eq!(runs.len(), 2);
        assert_run(&runs[0], (3.0, 0.0), (10.0, 0.0));
        assert_run(&runs[1], (10.0, 3.0), (10.0, 8.0));
        assert!(p.is_contiguous_to_polyline(&other));
    }

    #[test]
    fn tolerance_config_drives_auto_tolerance() {
        let config = ToleranceConfig::default().with_global_epsilon(1e-5);
        let mut p = pl(&[(0.0, 0.0), (1.0, 0.0)]).with_tolerance_config(config);
        assert_relative_eq!(p.tolerance(), 1e-5);
        p.append_point(Point2::new(1.0, 1.0));
        assert_relative_eq!(p.tolerance(), 1e-5);
        p.set_tolerance(0.25);
        p.set_auto_tolerance();
        assert_relative_eq!(p.tolerance(), 1e-5);
        assert_relative_eq!(pl(&[(0.0, 0.0), (1.0, 0.0)]).tolerance(), 1e-8);
    }
}
