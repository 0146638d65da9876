pub mod accent;
pub mod alignment;
pub mod cli;
pub mod contour;
pub mod phrases;
pub mod scoring;
pub mod units;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use accent::{Accent, AccentClass, AccentModel, AccentResolution, AccentSource};
pub use accent::{PitchPattern, PitchSymbol};
pub use alignment::{AlignerKind, SegmentalAligner, SegmentalDiff, SegmentalError};
pub use alignment::SegmentalErrorKind;
pub use contour::{ContourMatcher, ContourStatus, PitchContour, PitchDiff, PitchError};
pub use contour::{PitchErrorKind, PitchThresholds};
pub use scoring::{AnalysisReport, CompositeScorer, EngineConfig, ErrorSummary};
pub use scoring::{LabelBreakpoints, ScoringWeights, SimilarityLabel};
pub use units::{KanaMoraExtractor, SoundUnit, SoundUnitExtractor, SoundUnitSequence};

/// Convenient alias for results returned by pronunciation modules.
pub type Result<T> = std::result::Result<T, PronunciationError>;

/// Lightweight error type shared by the analysis engine and its collaborators.
#[derive(Debug, Clone)]
pub struct PronunciationError {
    message: Arc<str>,
}

impl PronunciationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for PronunciationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for PronunciationError {}

impl From<anyhow::Error> for PronunciationError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Scores one attempt with the default engine configuration.
///
/// Never fails: collaborator errors degrade the report instead of
/// propagating, see [`CompositeScorer::score`].
pub fn analyze(
    expected_phrase: &str,
    transcription: &str,
    pitch_contour: &PitchContour,
) -> AnalysisReport {
    CompositeScorer::default().score(expected_phrase, transcription, pitch_contour)
}
