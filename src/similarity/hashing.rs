use std::fmt;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{similarity::grayscale::GrayscaleGrid, EngineResult, Error};

/// A fixed-length string of hash bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashBits(BitVec<usize, Lsb0>);

impl HashBits {
    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        Self(bits.into_iter().collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().by_vals()
    }
}

impl fmt::Display for HashBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// aHash: one bit per grid cell, set when the cell is strictly brighter than the grid mean.
/// A grid where every cell has the same value therefore hashes to all zeros.
#[must_use]
pub fn average_hash(grid: &GrayscaleGrid) -> HashBits {
    let mean = grid.mean();
    HashBits::from_bools(grid.values().iter().map(|&v| f64::from(v) > mean))
}

/// dHash: for every row, one bit per horizontally adjacent pair, set when the left cell is
/// brighter than the right. An NxN grid gives N*(N-1) bits.
#[must_use]
pub fn difference_hash(grid: &GrayscaleGrid) -> HashBits {
    HashBits::from_bools(
        grid.rows()
            .flat_map(|row| row.windows(2).map(|pair| pair[0] > pair[1])),
    )
}

/// The "perceptual" hash. This is not a DCT hash: it is defined to be exactly the average hash,
/// and is kept as a separate entry point so that its contribution to the combined perceptual
/// score stays explicit.
#[must_use]
pub fn perceptual_hash(grid: &GrayscaleGrid) -> HashBits {
    average_hash(grid)
}

/// The number of positions at which two equal-length hashes differ.
///
/// # Errors
/// [`Error::HashLengthMismatch`] if the hashes have different lengths.
pub fn hamming_distance(first: &HashBits, second: &HashBits) -> EngineResult<u32> {
    if first.len() != second.len() {
        return Err(Error::HashLengthMismatch {
            left: first.len(),
            right: second.len(),
        });
    }

    let differing = first
        .bits()
        .zip(second.bits())
        .filter(|(a, b)| a != b)
        .count();

    Ok(differing as u32)
}

/// Percentage of matching bits, `100 * (1 - differing / length)`. Two empty hashes are 100%
/// similar.
///
/// # Errors
/// [`Error::HashLengthMismatch`] if the hashes have different lengths.
pub fn hamming_similarity(first: &HashBits, second: &HashBits) -> EngineResult<f64> {
    let distance = hamming_distance(first, second)?;
    if first.len() == 0 {
        return Ok(100.0);
    }

    Ok(100.0 * (1.0 - f64::from(distance) / first.len() as f64))
}
