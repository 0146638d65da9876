use crate::pronunciation::SoundUnitSequence;

use super::{SegmentalAligner, SegmentalDiff, SegmentalError};

/// Minimum edit distance alignment over morae. Each reported error is one
/// edit operation, so a dropped mora stays a single `Missing` entry.
///
/// Positions refer to the expected sequence: the index of the missing or
/// substituted mora, or the index an extra mora was inserted before.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceAligner;

impl SegmentalAligner for EditDistanceAligner {
    fn align(&self, expected: &SoundUnitSequence, actual: &SoundUnitSequence) -> SegmentalDiff {
        let compared = expected.len().max(actual.len());
        let table = fill_table(expected, actual);
        let (errors, matched) = backtrack(&table, expected, actual);
        SegmentalDiff::new(errors, matched, compared)
    }
}

fn fill_table(expected: &SoundUnitSequence, actual: &SoundUnitSequence) -> Vec<Vec<usize>> {
    let rows = expected.len();
    let cols = actual.len();
    let mut dp = vec![vec![0usize; cols + 1]; rows + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }
    for i in 1..=rows {
        for j in 1..=cols {
            let cost = usize::from(expected[i - 1] != actual[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp
}

fn backtrack(
    dp: &[Vec<usize>],
    expected: &SoundUnitSequence,
    actual: &SoundUnitSequence,
) -> (Vec<SegmentalError>, usize) {
    let mut errors = Vec::new();
    let mut matched = 0;
    let (mut i, mut j) = (expected.len(), actual.len());
    while i > 0 || j > 0 {
        let current = dp[i][j];
        if i > 0 && j > 0 && expected[i - 1] == actual[j - 1] && current == dp[i - 1][j - 1] {
            matched += 1;
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && current == dp[i - 1][j - 1] + 1 {
            errors.extend(SegmentalError::classify(
                i - 1,
                expected.get(i - 1),
                actual.get(j - 1),
            ));
            i -= 1;
            j -= 1;
        } else if i > 0 && current == dp[i - 1][j] + 1 {
            errors.extend(SegmentalError::classify(i - 1, expected.get(i - 1), None));
            i -= 1;
        } else {
            errors.extend(SegmentalError::classify(i, None, actual.get(j - 1)));
            j -= 1;
        }
    }
    errors.reverse();
    (errors, matched)
}
