// Directional distance between an anchor and a candidate
//
// All functions work on viewport rectangles. A `None` distance means the
// candidate lies in the wrong direction and must never be considered.

use crate::chain::Position;
use crate::dom::Rect;

/// A box may overlap the bottom edge of its anchor by up to this many pixels
/// and still count as below it.
pub const BOUNDARY_SLACK: f64 = 2.0;

/// Projections overlapping by more than `epsilon` on the horizontal axis.
pub fn overlaps_horizontally(a: &Rect, b: &Rect, epsilon: f64) -> bool {
    a.right - b.left > epsilon && b.right - a.left > epsilon
}

/// Projections overlapping by more than `epsilon` on the vertical axis.
pub fn overlaps_vertically(a: &Rect, b: &Rect, epsilon: f64) -> bool {
    a.bottom - b.top > epsilon && b.bottom - a.top > epsilon
}

/// Distance down from `upper` to `lower`, if `lower` starts below `upper`.
pub fn distance_down(upper: &Rect, lower: &Rect) -> Option<f64> {
    (upper.bottom <= lower.top + BOUNDARY_SLACK).then(|| lower.top - upper.bottom + BOUNDARY_SLACK)
}

/// Distance right from `left`'s midpoint to `right`'s midpoint, if not negative.
pub fn distance_right(left: &Rect, right: &Rect) -> Option<f64> {
    let from = (left.left + left.right) / 2.0;
    let to = (right.left + right.right) / 2.0;
    (from <= to).then(|| to - from)
}

/// Distance of `candidate` from `anchor` in `position`, or `None` when the
/// candidate is not in that direction at all.
pub fn directional_distance(
    position: Position,
    anchor: &Rect,
    candidate: &Rect,
    epsilon: f64,
) -> Option<f64> {
    match position {
        Position::Below => distance_down(anchor, candidate),
        Position::Under => overlaps_horizontally(anchor, candidate, epsilon)
            .then(|| distance_down(anchor, candidate))
            .flatten(),
        Position::LeftOf => overlaps_vertically(anchor, candidate, epsilon)
            .then(|| distance_right(candidate, anchor))
            .flatten(),
        Position::RightOf => overlaps_vertically(anchor, candidate, epsilon)
            .then(|| distance_right(anchor, candidate))
            .flatten(),
        Position::Inside => (overlaps_horizontally(anchor, candidate, epsilon)
            && overlaps_vertically(anchor, candidate, epsilon))
        .then_some(0.0),
        Position::Global => None,
    }
}
