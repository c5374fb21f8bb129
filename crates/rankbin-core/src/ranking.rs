//! Rank ordering.

/// Indices of `rank` in non-decreasing rank order.
///
/// The sort is stable: equal ranks keep their input order. Ranks are
/// compared with [`f32::total_cmp`], callers are expected to have rejected
/// NaN beforehand.
pub(crate) fn argsort(rank: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..rank.len()).collect();
    indices.sort_by(|&a, &b| rank[a].total_cmp(&rank[b]));
    indices
}

/// First non-finite rank, if any.
pub(crate) fn first_non_finite(rank: &[f32]) -> Option<(usize, f32)> {
    rank.iter()
        .copied()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
}
