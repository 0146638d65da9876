//! Segmental comparison of expected and produced mora sequences.

mod edit;
mod positional;

pub use edit::EditDistanceAligner;
pub use positional::PositionalAligner;

use serde::{Deserialize, Serialize};

use crate::pronunciation::scoring::feedback::plural;
use crate::pronunciation::{SoundUnit, SoundUnitSequence};

const PERFECT_FEEDBACK: &str = "Every mora matched the target phrase.";

/// Compares an expected mora sequence against what the learner produced.
pub trait SegmentalAligner: Send + Sync {
    fn align(&self, expected: &SoundUnitSequence, actual: &SoundUnitSequence) -> SegmentalDiff;
}

/// Selects the aligner the composite scorer runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlignerKind {
    /// Index-by-index comparison; an early drop cascades into substitutions.
    #[default]
    Positional,
    /// Minimum edit distance with backtracking.
    EditDistance,
}

impl AlignerKind {
    pub fn build(self) -> Box<dyn SegmentalAligner> {
        match self {
            Self::Positional => Box::new(PositionalAligner),
            Self::EditDistance => Box::new(EditDistanceAligner),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentalErrorKind {
    Missing,
    Extra,
    Substituted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentalError {
    pub position: usize,
    pub kind: SegmentalErrorKind,
    pub expected: Option<SoundUnit>,
    pub actual: Option<SoundUnit>,
}

impl SegmentalError {
    /// Classifies a pair of optional units; `None` when they match.
    pub(crate) fn classify(
        position: usize,
        expected: Option<&SoundUnit>,
        actual: Option<&SoundUnit>,
    ) -> Option<Self> {
        let kind = match (expected, actual) {
            (None, None) => return None,
            (None, Some(_)) => SegmentalErrorKind::Extra,
            (Some(_), None) => SegmentalErrorKind::Missing,
            (Some(lhs), Some(rhs)) if lhs == rhs => return None,
            (Some(_), Some(_)) => SegmentalErrorKind::Substituted,
        };
        Some(Self {
            position,
            kind,
            expected: expected.cloned(),
            actual: actual.cloned(),
        })
    }
}

/// Classified mora differences plus the accuracy ratio they imply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentalDiff {
    pub errors: Vec<SegmentalError>,
    pub correct: usize,
    pub compared: usize,
    pub accuracy: f64,
}

impl SegmentalDiff {
    /// Builds a diff; accuracy is `correct / compared`, or 1.0 when nothing
    /// was compared.
    pub fn new(errors: Vec<SegmentalError>, correct: usize, compared: usize) -> Self {
        let accuracy = if compared == 0 {
            1.0
        } else {
            correct as f64 / compared as f64
        };
        Self {
            errors,
            correct,
            compared,
            accuracy,
        }
    }

    /// Diff for a dimension whose inputs could not be produced.
    pub fn failed() -> Self {
        Self {
            errors: Vec::new(),
            correct: 0,
            compared: 0,
            accuracy: 0.0,
        }
    }

    pub fn score(&self) -> f64 {
        (self.accuracy * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_perfect(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn count(&self, kind: SegmentalErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind == kind).count()
    }

    pub fn missing_count(&self) -> usize {
        self.count(SegmentalErrorKind::Missing)
    }

    pub fn extra_count(&self) -> usize {
        self.count(SegmentalErrorKind::Extra)
    }

    pub fn substituted_count(&self) -> usize {
        self.count(SegmentalErrorKind::Substituted)
    }

    /// One clause per error category present, or a fixed sentence when clean.
    pub fn feedback(&self) -> String {
        let clauses = self.clauses();
        if clauses.is_empty() {
            PERFECT_FEEDBACK.to_string()
        } else {
            clauses.join(" ")
        }
    }

    pub(crate) fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        let missing = self.missing_count();
        if missing > 0 {
            clauses.push(format!("You dropped {}.", plural(missing, "mora", "morae")));
        }
        let extra = self.extra_count();
        if extra > 0 {
            clauses.push(format!("You added {}.", plural(extra, "extra mora", "extra morae")));
        }
        let substituted = self.substituted_count();
        if substituted > 0 {
            clauses.push(format!(
                "{} sounded different from the target.",
                capitalize(&plural(substituted, "mora", "morae"))
            ));
        }
        clauses
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{SegmentalDiff, SegmentalError, SegmentalErrorKind, PERFECT_FEEDBACK};
    use crate::pronunciation::SoundUnit;

    #[test]
    fn empty_comparison_is_fully_accurate() {
        let diff = SegmentalDiff::new(Vec::new(), 0, 0);
        assert_eq!(diff.accuracy, 1.0);
        assert_eq!(diff.feedback(), PERFECT_FEEDBACK);
    }

    #[test]
    fn feedback_lists_each_category_once() {
        let unit = SoundUnit::from("に");
        let errors = vec![
            SegmentalError::classify(0, Some(&unit), None).unwrap(),
            SegmentalError::classify(1, Some(&unit), None).unwrap(),
            SegmentalError::classify(2, None, Some(&unit)).unwrap(),
        ];
        let diff = SegmentalDiff::new(errors, 2, 5);
        assert_eq!(diff.missing_count(), 2);
        assert_eq!(diff.count(SegmentalErrorKind::Extra), 1);
        assert_eq!(
            diff.feedback(),
            "You dropped 2 morae. You added 1 extra mora."
        );
    }

    #[test]
    fn equal_units_do_not_classify() {
        let unit = SoundUnit::from("は");
        assert!(SegmentalError::classify(0, Some(&unit), Some(&unit)).is_none());
        assert!(SegmentalError::classify(0, None, None).is_none());
    }
}
