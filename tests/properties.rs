#![allow(clippy::unwrap_used)]

use std::f64::consts::{PI, TAU};

use approx::assert_relative_eq;
use planis::geometry::{Bearing, CrossResult, Line, Polyline, Segment};
use planis::math::tolerance::{compute_auto_tolerance, points_equal, MAX_EPSILON};
use planis::math::Point2;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1.0e4..1.0e4
}

fn point() -> impl Strategy<Value = Point2> {
    (coord(), coord()).prop_map(|(x, y)| Point2::new(x, y))
}

fn grid_point() -> impl Strategy<Value = Point2> {
    (0i32..20, 0i32..20).prop_map(|(x, y)| Point2::new(f64::from(x), f64::from(y)))
}

proptest! {
    #[test]
    fn auto_tolerance_is_monotonic_and_capped(x in -1.0e12..1.0e12_f64, y in -1.0e12..1.0e12_f64, k in 1.0..1.0e3_f64) {
        let small = compute_auto_tolerance([&Point2::new(x, y)]);
        let large = compute_auto_tolerance([&Point2::new(x * k, y * k)]);
        prop_assert!(small >= 0.0);
        prop_assert!(small <= large);
        prop_assert!(large <= MAX_EPSILON);
    }

    #[test]
    fn slope_intercept_round_trip(slope in -50.0..50.0_f64, intercept in -1.0e3..1.0e3_f64) {
        let line = Line::from_slope_intercept(slope, intercept).unwrap();
        prop_assert_eq!(line.is_inverted(), slope.abs() > 2.0);
        assert_relative_eq!(line.slope(), slope, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(line.intercept(), intercept, epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn segment_intersection_is_symmetric(a in point(), b in point(), c in point(), d in point()) {
        let ab = Segment::new(a, b);
        let cd = Segment::new(c, d);
        let forward = ab.intersect_segment(&cd);
        let backward = cd.intersect_segment(&ab);
        prop_assert_eq!(forward.status(), backward.status());
        if let (CrossResult::CrossFound(p), CrossResult::CrossFound(q)) = (forward, backward) {
            prop_assert!(points_equal(&p, &q, 1e-6));
        }
    }

    #[test]
    fn relative_position_round_trip(a in point(), b in point(), t in 0.0..=1.0_f64) {
        let segment = Segment::new(a, b);
        prop_assume!(!segment.is_null() && segment.length() > 1e-3);
        let p = segment.relative_point(t).unwrap();
        assert_relative_eq!(segment.relative_position(&p).unwrap(), t, epsilon = 1e-9);
    }

    #[test]
    fn line_is_parallel_to_itself(a in point(), b in point()) {
        let line = Line::from_points(&a, &b);
        prop_assert!(line.is_parallel_to(&line));
    }

    #[test]
    fn bearing_wraps_around(theta in -100.0..100.0_f64) {
        let bearing = Bearing::from_angle(theta);
        prop_assert!(bearing.is_equal_to(&Bearing::from_angle(theta + TAU), 1e-9));
        prop_assert!(!bearing.is_equal_to(&Bearing::from_angle(theta + PI), 1e-9));
    }

    #[test]
    fn split_pieces_rebuild_the_path(points in prop::collection::vec(grid_point(), 2..9)) {
        let original = Polyline::from_points(points.clone());
        let pieces = original.split_into_non_auto_crossing(false).unwrap();

        let mut rebuilt: Vec<Point2> = Vec::new();
        for piece in &pieces {
            for p in piece.points() {
                if rebuilt.last().is_some_and(|q| points_equal(q, p, 1e-9)) {
                    continue;
                }
                rebuilt.push(*p);
            }
        }
        // Every input vertex survives, in order, between the inserted cut points.
        let mut expected: Vec<Point2> = Vec::new();
        for p in &points {
            if !expected.last().is_some_and(|q| points_equal(q, p, 1e-9)) {
                expected.push(*p);
            }
        }
        let mut remaining = expected.iter().peekable();
        for p in &rebuilt {
            if remaining.peek().is_some_and(|q| points_equal(q, p, 1e-9)) {
                remaining.next();
            }
        }
        prop_assert!(remaining.next().is_none());

        let total: f64 = pieces.iter().map(Polyline::length).sum();
        assert_relative_eq!(total, original.length(), epsilon = 1e-9, max_relative = 1e-12);
        for piece in &pieces {
            prop_assert!(!piece.auto_crosses());
        }
    }
}

#[test]
fn split_cuts_a_path_crossing_its_own_vertex() {
    let coords = [(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0), (5.0, 0.0), (5.0, -5.0)];
    let original = Polyline::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)));
    assert!(original.auto_crosses());

    let pieces = original.split_into_non_auto_crossing(false).unwrap();
    assert_eq!(pieces.len(), 3);
    let total: f64 = pieces.iter().map(Polyline::length).sum();
    assert_relative_eq!(total, original.length(), epsilon = 1e-9);
    for piece in &pieces {
        assert!(!piece.auto_crosses());
    }

    let mut rebuilt: Vec<Point2> = Vec::new();
    for piece in &pieces {
        for p in piece.points() {
            if !rebuilt.last().is_some_and(|q| points_equal(q, p, 1e-9)) {
                rebuilt.push(*p);
            }
        }
    }
    assert_eq!(rebuilt.len(), coords.len() + 1);
    let mut remaining = coords.iter().peekable();
    for p in &rebuilt {
        if remaining.peek().is_some_and(|&&(x, y)| points_equal(&Point2::new(x, y), p, 1e-9)) {
            remaining.next();
        }
    }
    assert!(remaining.next().is_none());
}

#[test]
fn closed_needle_removal_is_idempotent() {
    let coords = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (8.0, 0.0), (5.0, 0.0), (0.0, 0.0)];
    let mut polyline = Polyline::from_points(coords.iter().map(|&(x, y)| Point2::new(x, y)));
    let removed = polyline.remove_auto_contiguous_needles(true).unwrap();
    assert_eq!(removed, 2);
    assert!(polyline.is_closed());
    assert!(!polyline.is_auto_contiguous());
    assert_eq!(polyline.remove_auto_contiguous_needles(true).unwrap(), 0);
}
