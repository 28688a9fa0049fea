//! Edge snapping for dragged placements
//!
//! Each axis is resolved on its own. For every other rectangle, in the order
//! given, four alignments are tried against the running position:
//!
//! 1. moving start edge to the other's end edge
//! 2. moving end edge to the other's start edge
//! 3. start to start
//! 4. end to end
//!
//! A match within the threshold moves the position exactly onto the target.
//! Later matches win over earlier ones, so the result depends on the order of
//! `others`.

use super::types::Rect;

/// Snap a rectangle positioned at its candidate origin against its neighbours.
///
/// Returns the adjusted `(x, y)` origin.
pub fn snap<I>(candidate: Rect, others: I, threshold: u32) -> (i64, i64)
where
    I: IntoIterator<Item = Rect>,
{
    let others: Vec<Rect> = others.into_iter().collect();
    let threshold = i64::from(threshold);

    let x = snap_axis(
        candidate.x,
        i64::from(candidate.width),
        others.iter().map(|o| (o.x, o.right())),
        threshold,
    );
    let y = snap_axis(
        candidate.y,
        i64::from(candidate.height),
        others.iter().map(|o| (o.y, o.bottom())),
        threshold,
    );
    (x, y)
}

/// Snap one axis. `spans` yields each neighbour's `(start, end)` on this axis.
fn snap_axis<I>(start: i64, extent: i64, spans: I, threshold: i64) -> i64
where
    I: Iterator<Item = (i64, i64)>,
{
    let mut pos = start;
    for (other_start, other_end) in spans {
        // (offset of the moving edge from `pos`, target coordinate)
        let checks = [
            (0, other_end),
            (extent, other_start),
            (0, other_start),
            (extent, other_end),
        ];
        for (offset, target) in checks {
            let edge = pos.saturating_add(offset);
            if edge.abs_diff(target) <= threshold.unsigned_abs() {
                pos = target.saturating_sub(offset);
            }
        }
    }
    pos
}
