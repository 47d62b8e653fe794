use tracing::trace;

use crate::error::{OperationError, Result};
use crate::math::tolerance::points_equal;
use crate::math::Point2;

/// Chains the pieces of a closed polyline into closed loops.
///
/// Pieces are in path order, so piece `k + 1` is the natural successor of
/// piece `k`. At a crossing the chain switches to the other branch (a piece
/// leaving the junction that is not the successor), which is what keeps
/// the loops from crossing. Failing that, the successor is taken, then a
/// piece whose end meets the junction, walked backwards.
///
/// # Errors
///
/// Returns `OperationError::Failed` when a chain cannot be closed.
pub fn connect(pieces: &[Vec<Point2>], tol: f64) -> Result<Vec<Vec<Point2>>> {
    let n = pieces.len();
    let mut used = vec![false; n];
    let mut loops = Vec::new();

    while let Some(start) = used.iter().position(|u| !u) {
        used[start] = true;
        let mut chain = pieces[start].clone();
        let mut current = start;

        while !is_loop(&chain, tol) {
            let Some(&end) = chain.last() else { break };
            let Some((next, reversed)) = pick_next(pieces, &used, current, &end, tol) else {
                return Err(OperationError::Failed(
                    "split pieces do not chain into closed loops".to_owned(),
                )
                .into());
            };
            used[next] = true;
            trace!(from = current, to = next, reversed, "chained piece");
            if reversed {
                chain.extend(pieces[next].iter().rev().skip(1));
            } else {
                chain.extend(pieces[next].iter().skip(1));
            }
            current = next;
        }

        // Snap the loop exactly shut.
        if let (Some(first), Some(last)) = (chain.first().copied(), chain.last_mut()) {
            *last = first;
        }
        loops.push(chain);
    }
    Ok(loops)
}

fn is_loop(chain: &[Point2], tol: f64) -> bool {
    match (chain.first(), chain.last()) {
        (Some(first), Some(last)) => chain.len() > 2 && points_equal(first, last, tol),
        _ => false,
    }
}

fn pick_next(
    pieces: &[Vec<Point2>],
    used: &[bool],
    current: usize,
    junction: &Point2,
    tol: f64,
) -> Option<(usize, bool)> {
    let successor = (current + 1) % pieces.len();
    let free = |k: &usize| !used[*k];
    let starts_here = |k: &usize| pieces[*k].first().is_some_and(|p| points_equal(p, junction, tol));
    let ends_here = |k: &usize| pieces[*k].last().is_some_and(|p| points_equal(p, junction, tol));

    let forward: Vec<usize> = (0..pieces.len()).filter(free).filter(starts_here).collect();
    if let Some(&k) = forward.iter().find(|&&k| k != successor) {
        return Some((k, false));
    }
    if let Some(&k) = forward.first() {
        return Some((k, false));
    }
    (0..pieces.len())
        .filter(free)
        .find(ends_here)
        .map(|k| (k, true))
}
