use rand::prelude::*;

use crate::definitions::{PLACEHOLDER_MAX, PLACEHOLDER_MIN};

/// Placeholder `(repeatedFrames, temporalSimilarity)` scores for the video profile.
///
/// Only one frame of each video is decoded, so there is nothing to measure. The values are drawn
/// uniformly from `85.0..100.0` by a generator seeded with `seed`, so a given seed always yields
/// the same pair. They say nothing about the videos being compared.
#[must_use]
pub fn placeholder_temporal_scores(seed: u64) -> (f64, f64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let repeated_frames = rng.gen_range(PLACEHOLDER_MIN..PLACEHOLDER_MAX);
    let temporal_similarity = rng.gen_range(PLACEHOLDER_MIN..PLACEHOLDER_MAX);
    (repeated_frames, temporal_similarity)
}
