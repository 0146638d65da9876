//! Weighted merge of segmental and pitch accuracy into one graded report.

pub mod feedback;
mod similarity;

pub use similarity::{levenshtein, similarity_score, LabelBreakpoints, SimilarityLabel};

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::pronunciation::{
    AccentModel, AccentResolution, AlignerKind, ContourMatcher, KanaMoraExtractor, PitchContour,
    PitchDiff, PitchErrorKind, PitchThresholds, Result, SegmentalAligner, SegmentalDiff,
    SoundUnitExtractor, SoundUnitSequence,
};

pub const DEFAULT_SEGMENTAL_WEIGHT: f64 = 0.6;
pub const DEFAULT_PITCH_WEIGHT: f64 = 0.4;

/// Blend applied to the two sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub segmental: f64,
    pub pitch: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            segmental: DEFAULT_SEGMENTAL_WEIGHT,
            pitch: DEFAULT_PITCH_WEIGHT,
        }
    }
}

impl ScoringWeights {
    /// `round(segmental_weight·segmental + pitch_weight·pitch)`, clamped to 0..=100.
    pub fn combine(&self, segmental_score: f64, pitch_score: f64) -> u8 {
        let blended = self.segmental * segmental_score + self.pitch * pitch_score;
        if blended.is_finite() {
            blended.round().clamp(0.0, 100.0) as u8
        } else {
            0
        }
    }
}

/// Every tunable constant of the engine in one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aligner: AlignerKind,
    pub weights: ScoringWeights,
    pub labels: LabelBreakpoints,
    pub pitch: PitchThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentalAnalysis {
    pub expected_units: SoundUnitSequence,
    pub actual_units: SoundUnitSequence,
    pub diff: SegmentalDiff,
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchAnalysis {
    pub accent: AccentResolution,
    pub diff: PitchDiff,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub total_errors: usize,
    pub segmental_error_count: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    pub substituted_count: usize,
    pub pitch_error_count: usize,
    pub missing_high_count: usize,
    pub unexpected_high_count: usize,
    pub has_errors: bool,
}

impl ErrorSummary {
    pub fn from_diffs(segmental: &SegmentalDiff, pitch: &PitchDiff) -> Self {
        let segmental_error_count = segmental.errors.len();
        let pitch_error_count = pitch.errors.len();
        let total_errors = segmental_error_count + pitch_error_count;
        Self {
            total_errors,
            segmental_error_count,
            missing_count: segmental.missing_count(),
            extra_count: segmental.extra_count(),
            substituted_count: segmental.substituted_count(),
            pitch_error_count,
            missing_high_count: pitch.count(PitchErrorKind::MissingHighPitch),
            unexpected_high_count: pitch.count(PitchErrorKind::UnexpectedHighPitch),
            has_errors: total_errors > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub expected_phrase: String,
    pub transcription: String,
    pub similarity_score: u8,
    pub similarity_label: SimilarityLabel,
    pub overall_score: u8,
    pub overall_label: SimilarityLabel,
    pub segmental: SegmentalAnalysis,
    pub pitch: PitchAnalysis,
    pub feedback: String,
    pub errors: ErrorSummary,
    /// Collaborator failures that zeroed part of the report.
    pub failures: Vec<String>,
}

impl AnalysisReport {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs extraction, alignment, accent resolution and contour matching, and
/// folds the results into an [`AnalysisReport`].
pub struct CompositeScorer {
    config: EngineConfig,
    extractor: Box<dyn SoundUnitExtractor>,
    aligner: Box<dyn SegmentalAligner>,
    accent: AccentModel,
    matcher: ContourMatcher,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CompositeScorer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            extractor: Box::new(KanaMoraExtractor::new()),
            aligner: config.aligner.build(),
            accent: AccentModel::default(),
            matcher: ContourMatcher::new(config.pitch),
        }
    }

    pub fn with_extractor(mut self, extractor: impl SoundUnitExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_aligner(mut self, aligner: impl SegmentalAligner + 'static) -> Self {
        self.aligner = Box::new(aligner);
        self
    }

    pub fn with_accent_model(mut self, accent: AccentModel) -> Self {
        self.accent = accent;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Always returns a complete report; see [`Self::score_with_pitch`].
    pub fn score(
        &self,
        expected_phrase: &str,
        transcription: &str,
        pitch_contour: &PitchContour,
    ) -> AnalysisReport {
        self.score_with_pitch(expected_phrase, transcription, Ok(pitch_contour))
    }

    /// Scores an attempt whose contour may have failed to extract. Any
    /// collaborator error zeroes the affected dimension and is named in the
    /// feedback instead of being returned.
    pub fn score_with_pitch(
        &self,
        expected_phrase: &str,
        transcription: &str,
        pitch_contour: Result<&PitchContour>,
    ) -> AnalysisReport {
        let _span = info_span!("score", expected = expected_phrase).entered();
        let labels = self.config.labels;
        let mut failures = Vec::new();

        let similarity = similarity_score(transcription, expected_phrase);
        let similarity_label = labels.label(similarity);

        let expected_units = self.extract_units(expected_phrase, "expected phrase", &mut failures);
        let actual_units = self.extract_units(transcription, "transcription", &mut failures);

        let segmental = self.segmental(expected_units.as_ref(), actual_units.as_ref());
        let pitch = self.pitch(
            expected_phrase,
            expected_units.as_ref(),
            pitch_contour,
            &mut failures,
        );

        let overall = self.config.weights.combine(segmental.score, pitch.score);
        let errors = ErrorSummary::from_diffs(&segmental.diff, &pitch.diff);
        let feedback =
            feedback::compose(similarity_label, &segmental.diff, &pitch.diff, &failures);

        info!(
            similarity,
            segmental = segmental.score,
            pitch = pitch.score,
            overall,
            errors = errors.total_errors,
            degraded = !failures.is_empty(),
            "scored attempt"
        );

        AnalysisReport {
            expected_phrase: expected_phrase.to_string(),
            transcription: transcription.to_string(),
            similarity_score: similarity,
            similarity_label,
            overall_score: overall,
            overall_label: labels.label(overall),
            segmental,
            pitch,
            feedback,
            errors,
            failures,
        }
    }

    fn extract_units(
        &self,
        text: &str,
        role: &str,
        failures: &mut Vec<String>,
    ) -> Option<SoundUnitSequence> {
        match self.extractor.extract(text) {
            Ok(units) => Some(units),
            Err(err) => {
                warn!(role, error = %err, "mora extraction failed");
                failures.push(format!("could not split the {role} into morae ({err})"));
                None
            }
        }
    }

    fn segmental(
        &self,
        expected: Option<&SoundUnitSequence>,
        actual: Option<&SoundUnitSequence>,
    ) -> SegmentalAnalysis {
        let diff = match (expected, actual) {
            (Some(expected), Some(actual)) => self.aligner.align(expected, actual),
            _ => SegmentalDiff::failed(),
        };
        SegmentalAnalysis {
            expected_units: expected.cloned().unwrap_or_default(),
            actual_units: actual.cloned().unwrap_or_default(),
            score: diff.score(),
            feedback: diff.feedback(),
            diff,
        }
    }

    fn pitch(
        &self,
        expected_phrase: &str,
        expected_units: Option<&SoundUnitSequence>,
        pitch_contour: Result<&PitchContour>,
        failures: &mut Vec<String>,
    ) -> PitchAnalysis {
        let accent = match expected_units {
            Some(units) => {
                let accent = self.accent.derive_pattern(units, Some(expected_phrase));
                assert_eq!(
                    accent.pattern.len(),
                    units.len(),
                    "accent model returned a pattern that does not cover every mora"
                );
                accent
            }
            None => AccentResolution::empty(),
        };

        let diff = match (expected_units, pitch_contour) {
            (_, Err(err)) => {
                warn!(error = %err, "pitch extraction failed");
                failures.push(format!("pitch extraction failed ({err})"));
                PitchDiff::failed(format!("Pitch extraction failed: {err}"))
            }
            (None, Ok(_)) => PitchDiff::failed("Expected morae unavailable; pitch not analyzed."),
            (Some(_), Ok(contour)) => self.matcher.match_contour(contour, &accent.pattern),
        };

        PitchAnalysis {
            accent,
            score: diff.score(),
            diff,
        }
    }
}
