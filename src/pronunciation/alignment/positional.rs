use crate::pronunciation::SoundUnitSequence;

use super::{SegmentalAligner, SegmentalDiff, SegmentalError};

/// Compares morae index by index, padding the shorter sequence with absent
/// slots. A single early drop shifts every later position and shows up as a
/// run of substitutions; use [`super::EditDistanceAligner`] to avoid that.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalAligner;

impl SegmentalAligner for PositionalAligner {
    fn align(&self, expected: &SoundUnitSequence, actual: &SoundUnitSequence) -> SegmentalDiff {
        let compared = expected.len().max(actual.len());
        let mut errors = Vec::new();
        let mut correct = 0;
        for position in 0..compared {
            match SegmentalError::classify(position, expected.get(position), actual.get(position)) {
                Some(error) => errors.push(error),
                None => correct += 1,
            }
        }
        SegmentalDiff::new(errors, correct, compared)
    }
}
