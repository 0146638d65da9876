//! Per-mora comparison of a measured F0 contour against the expected
//! high/low accent pattern.

mod extract;

pub use extract::{PitchExtractor, PyinPitchExtractor};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pronunciation::scoring::feedback::plural;
use crate::pronunciation::{PitchPattern, PitchSymbol};

pub const DEFAULT_HIGH_SIGMA: f32 = 0.5;
pub const DEFAULT_LOW_MEAN_SIGMA: f32 = 1.0;
pub const DEFAULT_LOW_PEAK_SIGMA: f32 = 1.5;

pub const UNABLE_TO_ANALYZE: &str =
    "Unable to analyze pitch: the recording or the expected pattern was empty.";
pub const NO_VOICED_SOUND: &str = "No voiced sound detected.";
const PITCH_MATCHED: &str = "Pitch accent matched the expected pattern.";
const RELATIVE_TOLERANCE: f64 = 1e-6;

/// F0 samples in Hz at a fixed time step; 0.0 marks an unvoiced frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct PitchContour(Vec<f32>);

impl PitchContour {
    /// Non-finite and negative samples are stored as unvoiced.
    pub fn new(values: Vec<f32>) -> Self {
        Self(
            values
                .into_iter()
                .map(|hz| if hz.is_finite() && hz > 0.0 { hz } else { 0.0 })
                .collect(),
        )
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn voiced_count(&self) -> usize {
        self.0.iter().filter(|&&hz| hz > 0.0).count()
    }
}

impl From<Vec<f32>> for PitchContour {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl From<PitchContour> for Vec<f32> {
    fn from(contour: PitchContour) -> Self {
        contour.0
    }
}

/// Standard-deviation multipliers used to call a segment high or low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchThresholds {
    /// A High segment's mean must exceed `µ + high_sigma·σ`.
    pub high_sigma: f32,
    /// A Low segment is flagged only if its mean exceeds `µ + low_mean_sigma·σ`
    pub low_mean_sigma: f32,
    /// and its peak exceeds `µ + low_peak_sigma·σ`.
    pub low_peak_sigma: f32,
}

impl Default for PitchThresholds {
    fn default() -> Self {
        Self {
            high_sigma: DEFAULT_HIGH_SIGMA,
            low_mean_sigma: DEFAULT_LOW_MEAN_SIGMA,
            low_peak_sigma: DEFAULT_LOW_PEAK_SIGMA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourStatus {
    Analyzed,
    EmptyInput,
    Unvoiced,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchErrorKind {
    MissingHighPitch,
    UnexpectedHighPitch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchError {
    pub position: usize,
    pub kind: PitchErrorKind,
    pub expected: PitchSymbol,
    pub actual: PitchSymbol,
    pub measured_pitch: f32,
    pub threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchDiff {
    pub status: ContourStatus,
    pub errors: Vec<PitchError>,
    pub correct: usize,
    pub segments: usize,
    pub accuracy: f64,
    pub mean_pitch: Option<f32>,
    pub pitch_std: Option<f32>,
    pub feedback: String,
}

impl PitchDiff {
    fn degenerate(status: ContourStatus, segments: usize, feedback: impl Into<String>) -> Self {
        Self {
            status,
            errors: Vec::new(),
            correct: 0,
            segments,
            accuracy: 0.0,
            mean_pitch: None,
            pitch_std: None,
            feedback: feedback.into(),
        }
    }

    /// Diff for an attempt whose contour or pattern could not be produced.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::degenerate(ContourStatus::Failed, 0, reason)
    }

    pub fn score(&self) -> f64 {
        let score = self.accuracy * 100.0;
        if score.is_finite() {
            score.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn count(&self, kind: PitchErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind == kind).count()
    }

    pub(crate) fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        let missing = self.count(PitchErrorKind::MissingHighPitch);
        if missing > 0 {
            clauses.push(format!(
                "{} should have been higher in pitch.",
                plural(missing, "mora", "morae")
            ));
        }
        let unexpected = self.count(PitchErrorKind::UnexpectedHighPitch);
        if unexpected > 0 {
            clauses.push(format!(
                "{} rose too high where a low pitch was expected.",
                plural(unexpected, "mora", "morae")
            ));
        }
        clauses
    }
}

/// Splits a contour into one window per mora and classifies each window
/// against statistics of the whole utterance's voiced frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourMatcher {
    thresholds: PitchThresholds,
}

impl ContourMatcher {
    pub fn new(thresholds: PitchThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> PitchThresholds {
        self.thresholds
    }

    pub fn match_contour(&self, contour: &PitchContour, pattern: &PitchPattern) -> PitchDiff {
        if contour.is_empty() || pattern.is_empty() {
            return PitchDiff::degenerate(
                ContourStatus::EmptyInput,
                pattern.len(),
                UNABLE_TO_ANALYZE,
            );
        }
        let voiced = voiced_samples(contour.values());
        let Some(mean) = voiced.mean() else {
            return PitchDiff::degenerate(
                ContourStatus::Unvoiced,
                pattern.len(),
                NO_VOICED_SOUND,
            );
        };
        let sigma = voiced.std(0.0);
        // Absorbs summation error so a constant contour sits exactly on µ.
        let tolerance = mean * RELATIVE_TOLERANCE;

        let high_threshold = mean + f64::from(self.thresholds.high_sigma) * sigma;
        let low_mean_threshold = mean + f64::from(self.thresholds.low_mean_sigma) * sigma;
        let low_peak_threshold = mean + f64::from(self.thresholds.low_peak_sigma) * sigma;

        let mut errors = Vec::new();
        let mut correct = 0;
        let ranges = segment_ranges(contour.len(), pattern.len());
        let windows = ranges.into_iter().zip(pattern.symbols());
        for (position, (range, &expected)) in windows.enumerate() {
            let segment = voiced_samples(&contour.values()[range]);
            let Some(segment_mean) = segment.mean() else {
                correct += 1;
                continue;
            };
            let error = match expected {
                PitchSymbol::High if segment_mean <= high_threshold + tolerance => {
                    Some(PitchError {
                        position,
                        kind: PitchErrorKind::MissingHighPitch,
                        expected,
                        actual: PitchSymbol::Low,
                        measured_pitch: segment_mean as f32,
                        threshold: high_threshold as f32,
                    })
                }
                PitchSymbol::Low
                    if segment_mean > low_mean_threshold + tolerance
                        && peak(&segment) > low_peak_threshold + tolerance =>
                {
                    Some(PitchError {
                        position,
                        kind: PitchErrorKind::UnexpectedHighPitch,
                        expected,
                        actual: PitchSymbol::High,
                        measured_pitch: segment_mean as f32,
                        threshold: low_mean_threshold as f32,
                    })
                }
                _ => None,
            };
            match error {
                Some(error) => errors.push(error),
                None => correct += 1,
            }
        }

        let segments = pattern.len();
        let accuracy = correct as f64 / segments as f64;
        debug!(
            mean,
            sigma,
            segments,
            correct,
            errors = errors.len(),
            "matched pitch contour"
        );
        let mut diff = PitchDiff {
            status: ContourStatus::Analyzed,
            errors,
            correct,
            segments,
            accuracy,
            mean_pitch: Some(mean as f32),
            pitch_std: Some(sigma as f32),
            feedback: String::new(),
        };
        let clauses = diff.clauses();
        diff.feedback = if clauses.is_empty() {
            PITCH_MATCHED.to_string()
        } else {
            clauses.join(" ")
        };
        diff
    }
}

/// Voiced frames widened to f64 so window means agree with the global mean.
fn voiced_samples(values: &[f32]) -> Array1<f64> {
    values
        .iter()
        .copied()
        .filter(|&hz| hz > 0.0)
        .map(f64::from)
        .collect()
}

fn peak(values: &Array1<f64>) -> f64 {
    values.iter().copied().fold(f64::MIN, f64::max)
}

/// `count` contiguous windows of `len / count` samples; the last window
/// absorbs the remainder. Windows are empty when `len < count`.
fn segment_ranges(len: usize, count: usize) -> Vec<std::ops::Range<usize>> {
    let size = len / count;
    (0..count)
        .map(|index| {
            let start = index * size;
            let end = if index + 1 == count { len } else { start + size };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{segment_ranges, PitchContour};

    #[test]
    fn last_segment_absorbs_remainder() {
        assert_eq!(segment_ranges(11, 3), vec![0..3, 3..6, 6..11]);
        assert_eq!(segment_ranges(2, 4), vec![0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn invalid_samples_become_unvoiced() {
        let contour = PitchContour::new(vec![120.0, f32::NAN, -3.0, 0.0, 130.0]);
        assert_eq!(contour.values(), &[120.0, 0.0, 0.0, 0.0, 130.0]);
        assert_eq!(contour.voiced_count(), 2);
    }
}
