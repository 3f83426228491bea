//! Path-segment correction for mismatched segment and point counts.

/// Map a data index onto a drawable path segment.
///
/// Rendered chart paths can carry a segment count that differs from the
/// number of data points (joined curves, dropped degenerate segments). The
/// correction offsets the index by the observed count delta and clamps it
/// into the valid segment range:
/// `clamp(min(index, segment_count + 1) - delta, 0, segment_count - 1)`
/// with `delta = point_count - segment_count`.
///
/// Returns `None` when there are no segments to map onto.
pub fn segment_for_index(index: usize, segment_count: usize, point_count: usize) -> Option<usize> {
    if segment_count == 0 {
        return None;
    }
    let delta = point_count as i64 - segment_count as i64;
    let capped = index.min(segment_count + 1) as i64;
    let segment = (capped - delta).clamp(0, segment_count as i64 - 1);
    Some(segment as usize)
}
