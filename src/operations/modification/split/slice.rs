use crate::error::{OperationError, Result};
use crate::math::tolerance::points_equal;
use crate::math::Point2;
use crate::operations::query::AutoIntersection;

/// Cuts the vertex list at every crossing, producing pieces in path order.
///
/// Both legs of a crossing are cut at the same point, so consecutive
/// pieces and the pieces meeting at a crossing share exact end points.
///
/// # Errors
///
/// Returns `OperationError::Failed` when a piece is not longer than `tol`,
/// which means the tolerance is unusable for these coordinates.
pub fn build(
    points: &[Point2],
    intersections: &[AutoIntersection],
    tol: f64,
) -> Result<Vec<Vec<Point2>>> {
    let Some(first) = points.first() else {
        return Ok(Vec::new());
    };

    // (leg, parameter on leg, point)
    let mut cuts: Vec<(usize, f64, Point2)> = intersections
        .iter()
        .flat_map(|ix| [(ix.leg_i, ix.t_i, ix.point), (ix.leg_j, ix.t_j, ix.point)])
        .collect();
    cuts.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    // Several crossings through one point cut a leg only once.
    cuts.dedup_by(|b, a| a.0 == b.0 && points_equal(&a.2, &b.2, tol));

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut current = vec![*first];
    let mut next_vertex = 1;
    for (leg, _, point) in cuts {
        while next_vertex <= leg {
            current.push(points[next_vertex]);
            next_vertex += 1;
        }
        // A cut through a vertex lands exactly on the vertex just pushed.
        if current.last() != Some(&point) {
            current.push(point);
        }
        // A cut on the first vertex leaves nothing behind it.
        if current.len() < 2 {
            continue;
        }
        pieces.push(finish(std::mem::replace(&mut current, vec![point]), tol)?);
    }
    current.extend_from_slice(&points[next_vertex..]);
    pieces.push(finish(current, tol)?);
    Ok(pieces)
}

fn finish(piece: Vec<Point2>, tol: f64) -> Result<Vec<Point2>> {
    let length: f64 = piece.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if length <= tol {
        return Err(OperationError::Failed(format!(
            "split produced a piece of length {length}, tolerance {tol} is unusable"
        ))
        .into());
    }
    Ok(piece)
}
