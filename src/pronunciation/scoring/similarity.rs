use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize, Serializer};

pub const PERFECT_BREAKPOINT: u8 = 95;
pub const GREAT_BREAKPOINT: u8 = 80;
pub const ALMOST_BREAKPOINT: u8 = 60;

/// Qualitative tier for a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityLabel {
    Perfect,
    GreatJob,
    AlmostThere,
    NeedsPractice,
}

impl SimilarityLabel {
    pub fn text(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect!",
            Self::GreatJob => "Great job!",
            Self::AlmostThere => "Almost there!",
            Self::NeedsPractice => "Needs practice",
        }
    }
}

impl Display for SimilarityLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

impl Serialize for SimilarityLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.text())
    }
}

/// Lower bounds (inclusive) of each label tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelBreakpoints {
    pub perfect: u8,
    pub great: u8,
    pub almost: u8,
}

impl Default for LabelBreakpoints {
    fn default() -> Self {
        Self {
            perfect: PERFECT_BREAKPOINT,
            great: GREAT_BREAKPOINT,
            almost: ALMOST_BREAKPOINT,
        }
    }
}

impl LabelBreakpoints {
    pub fn label(&self, score: u8) -> SimilarityLabel {
        if score >= self.perfect {
            SimilarityLabel::Perfect
        } else if score >= self.great {
            SimilarityLabel::GreatJob
        } else if score >= self.almost {
            SimilarityLabel::AlmostThere
        } else {
            SimilarityLabel::NeedsPractice
        }
    }
}

/// Character-level similarity in 0..=100, truncated toward zero.
/// Both strings empty scores 100; exactly one empty scores 0.
pub fn similarity_score(transcription: &str, expected: &str) -> u8 {
    let lhs: Vec<char> = transcription.trim().chars().collect();
    let rhs: Vec<char> = expected.trim().chars().collect();
    match (lhs.is_empty(), rhs.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        _ => {}
    }
    let longest = lhs.len().max(rhs.len());
    let distance = levenshtein(&lhs, &rhs).min(longest);
    ((100 * (longest - distance)) / longest) as u8
}

pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::{levenshtein, similarity_score, LabelBreakpoints, SimilarityLabel};

    #[test]
    fn distance_counts_single_edits() {
        let a: Vec<char> = "こんにちは".chars().collect();
        let b: Vec<char> = "こんちは".chars().collect();
        assert_eq!(levenshtein(&a, &b), 1);
        assert_eq!(levenshtein::<char>(&[], &b), 4);
    }

    #[test]
    fn similarity_edge_cases() {
        assert_eq!(similarity_score("", ""), 100);
        assert_eq!(similarity_score("", "こんにちは"), 0);
        assert_eq!(similarity_score("こんにちは", "  "), 0);
        assert_eq!(similarity_score("こんにちは", "こんにちは"), 100);
        assert_eq!(similarity_score("こんちは", "こんにちは"), 80);
        assert_eq!(similarity_score("こんばんは", "おはようございます"), 0);
        assert_eq!(similarity_score("こんにちはあ", "こんにちは"), 83);
    }

    #[test]
    fn label_breakpoints_are_inclusive() {
        let labels = LabelBreakpoints::default();
        assert_eq!(labels.label(95), SimilarityLabel::Perfect);
        assert_eq!(labels.label(94), SimilarityLabel::GreatJob);
        assert_eq!(labels.label(80), SimilarityLabel::GreatJob);
        assert_eq!(labels.label(60), SimilarityLabel::AlmostThere);
        assert_eq!(labels.label(59), SimilarityLabel::NeedsPractice);
    }

    #[test]
    fn label_text_matches_the_catalog_wording() {
        assert_eq!(SimilarityLabel::Perfect.text(), "Perfect!");
        assert_eq!(SimilarityLabel::NeedsPractice.text(), "Needs practice");
        let json = serde_json::to_string(&SimilarityLabel::NeedsPractice).unwrap();
        assert_eq!(json, "\"Needs practice\"");
    }
}
