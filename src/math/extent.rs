use super::tolerance::{greater_or_equal, smaller_or_equal};
use super::Point2;

/// Axis-aligned bounding box.
///
/// Used as the cheap reject test in front of every exact predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Extent {
    /// Creates the extent of two corner points (in any order).
    #[must_use]
    pub fn from_corners(a: &Point2, b: &Point2) -> Self {
        Self {
            x_min: a.x.min(b.x),
            y_min: a.y.min(b.y),
            x_max: a.x.max(b.x),
            y_max: a.y.max(b.y),
        }
    }

    /// Creates the extent of a point set, `None` when empty.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut extent = Self::from_corners(first, first);
        for p in iter {
            extent.add_point(p);
        }
        Some(extent)
    }

    /// Grows the extent to include `p`.
    pub fn add_point(&mut self, p: &Point2) {
        self.x_min = self.x_min.min(p.x);
        self.y_min = self.y_min.min(p.y);
        self.x_max = self.x_max.max(p.x);
        self.y_max = self.y_max.max(p.y);
    }

    /// Grows the extent to include `other`.
    pub fn union(&mut self, other: &Extent) {
        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether the two boxes share at least one point, borders included.
    #[must_use]
    pub fn overlaps(&self, other: &Extent, tol: f64) -> bool {
        greater_or_equal(self.x_max, other.x_min, tol)
            && smaller_or_equal(self.x_min, other.x_max, tol)
            && greater_or_equal(self.y_max, other.y_min, tol)
            && smaller_or_equal(self.y_min, other.y_max, tol)
    }

    /// Whether `p` lies inside the box, borders included.
    #[must_use]
    pub fn contains_point(&self, p: &Point2, tol: f64) -> bool {
        greater_or_equal(p.x, self.x_min, tol)
            && smaller_or_equal(p.x, self.x_max, tol)
            && greater_or_equal(p.y, self.y_min, tol)
            && smaller_or_equal(p.y, self.y_max, tol)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_points_spans_all() {
        let pts = [
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ];
        let e = Extent::from_points(&pts).unwrap();
        assert_eq!(e.x_min, -2.0);
        assert_eq!(e.x_max, 4.0);
        assert_eq!(e.y_min, -1.0);
        assert_eq!(e.y_max, 5.0);
        assert_eq!(e.width(), 6.0);
        assert_eq!(e.height(), 6.0);
    }

    #[test]
    fn empty_points_have_no_extent() {
        let pts: Vec<Point2> = Vec::new();
        assert!(Extent::from_points(&pts).is_none());
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = Extent::from_corners(&Point2::new(0.0, 0.0), &Point2::new(1.0, 1.0));
        let b = Extent::from_corners(&Point2::new(1.0, 0.5), &Point2::new(2.0, 2.0));
        let c = Extent::from_corners(&Point2::new(1.1, 0.5), &Point2::new(2.0, 2.0));
        assert!(a.overlaps(&b, 0.0));
        assert!(!a.overlaps(&c, 0.0));
        assert!(a.overlaps(&c, 0.2));
    }

    #[test]
    fn contains_point_with_tolerance() {
        let a = Extent::from_corners(&Point2::new(0.0, 0.0), &Point2::new(1.0, 1.0));
        assert!(a.contains_point(&Point2::new(1.0, 1.0), 0.0));
        assert!(!a.contains_point(&Point2::new(1.0 + 1e-6, 1.0), 1e-8));
        assert!(a.contains_point(&Point2::new(1.0 + 1e-9, 1.0), 1e-8));
    }
}
