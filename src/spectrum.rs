//! Statistics of a singular value spectrum.

use crate::types::{Result, SvdCompressionError};
use ndarray::{Array1, ArrayView1};
use num::Float;

/// Return the cumulative energy `cumsum(s) / sum(s)` of the singular values `s`.
///
/// The energy here is the plain sum of singular values. The last entry is exactly one
/// unless all singular values vanish, in which case the result is all zeros.
pub fn cumulative_energy<T: Float>(s: ArrayView1<T>) -> Array1<T> {
    let mut running = T::zero();
    let mut partial_sums: Array1<T> = s
        .iter()
        .map(|&item| {
            running = running + item;
            running
        })
        .collect();

    if running > T::zero() {
        partial_sums.mapv_inplace(|item| item / running);
    }
    partial_sums
}

/// Return the singular value associated with rank `rank`, i.e. `s[rank - 1]`.
pub fn singular_value_at_rank<T: Float>(s: ArrayView1<T>, rank: usize) -> Result<T> {
    if rank == 0 || rank > s.len() {
        return Err(SvdCompressionError::RankError {
            rank,
            max_rank: s.len(),
        });
    }
    Ok(s[rank - 1])
}

/// Smallest rank whose cumulative energy reaches `fraction`.
pub fn rank_for_energy<T: Float>(s: ArrayView1<T>, fraction: f64) -> Result<usize> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(SvdCompressionError::ToleranceError(fraction));
    }

    cumulative_energy(s)
        .iter()
        .position(|item| item.to_f64().map_or(false, |energy| energy >= fraction))
        .map(|index| index + 1)
        .ok_or(SvdCompressionError::CompressionError)
}
