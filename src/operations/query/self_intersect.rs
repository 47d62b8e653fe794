use tracing::trace;

use crate::geometry::polyline::Polyline;
use crate::geometry::segment::{CrossResult, Segment};
use crate::math::Point2;

/// A crossing between two legs of the same polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoIntersection {
    /// Index of the first leg.
    pub leg_i: usize,
    /// Index of the second leg (always > `leg_i`).
    pub leg_j: usize,
    /// Relative position on leg i (0..1).
    pub t_i: f64,
    /// Relative position on leg j (0..1).
    pub t_j: f64,
    pub point: Point2,
}

/// Finds every crossing between non-consecutive legs of a polyline.
///
/// Consecutive legs (and the last and first legs of a closed polyline)
/// share a vertex and are never tested. Each leg pair is filtered on its
/// extents before the exact test. Touches at a leg extremity are
/// connections and are not reported, except when the path goes through
/// another leg at one of its vertices: that vertex is reported as a cut at
/// the start of the leg leaving it (`t = 0`).
#[must_use]
pub fn find_all(polyline: &Polyline) -> Vec<AutoIntersection> {
    let legs: Vec<_> = polyline.segments().collect();
    let leg_count = legs.len();
    if leg_count < 3 {
        return Vec::new();
    }
    let closed = polyline.is_closed();
    let tol = polyline.tolerance();
    let extents: Vec<_> = legs.iter().map(Segment::extent).collect();

    let mut results = Vec::new();
    for i in 0..leg_count {
        for j in (i + 2)..leg_count {
            if closed && i == 0 && j == leg_count - 1 {
                continue;
            }
            if !extents[i].overlaps(&extents[j], tol) {
                continue;
            }
            let CrossResult::CrossFound(point) = legs[i].intersect_segment(&legs[j]) else {
                continue;
            };
            // Crossings are strictly interior, so both legs are non-null here.
            let (Ok(t_i), Ok(t_j)) = (
                legs[i].relative_position(&point),
                legs[j].relative_position(&point),
            ) else {
                continue;
            };
            trace!(i, j, x = point.x, y = point.y, "auto intersection");
            results.push(AutoIntersection {
                leg_i: i,
                leg_j: j,
                t_i: t_i.clamp(0.0, 1.0),
                t_j: t_j.clamp(0.0, 1.0),
                point,
            });
        }
    }

    // Second pass: a leg passing exactly through a vertex of the path.
    for (j, leg) in legs.iter().enumerate() {
        for k in polyline.crossing_vertices(leg) {
            let point = polyline.points()[k];
            let Ok(t) = leg.relative_position(&point) else {
                continue;
            };
            let t = t.clamp(0.0, 1.0);
            trace!(leg = j, vertex = k, x = point.x, y = point.y, "crossing through a vertex");
            results.push(if k < j {
                AutoIntersection {
                    leg_i: k,
                    leg_j: j,
                    t_i: 0.0,
                    t_j: t,
                    point,
                }
            } else {
                AutoIntersection {
                    leg_i: j,
                    leg_j: k,
                    t_i: t,
                    t_j: 0.0,
                    point,
                }
            });
        }
    }
    results
}
