//! Pitch-accent classes and the expected high/low pattern per mora.

pub mod dictionary;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pronunciation::{PronunciationError, SoundUnitSequence};

use dictionary::AccentDictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentClass {
    Flat,
    HeadHigh,
    MiddleHigh,
    TailHigh,
    RisingFalling,
}

impl AccentClass {
    /// Classifies a 1-based drop position within a word of `mora_count` morae.
    pub fn from_drop(position: usize, mora_count: usize) -> Self {
        match position {
            0 => Self::Flat,
            1 => Self::HeadHigh,
            p if p >= mora_count => Self::TailHigh,
            _ => Self::MiddleHigh,
        }
    }

    pub fn japanese_name(self) -> &'static str {
        match self {
            Self::Flat => "heiban",
            Self::HeadHigh => "atamadaka",
            Self::MiddleHigh => "nakadaka",
            Self::TailHigh => "odaka",
            Self::RisingFalling => "kifuku",
        }
    }
}

impl Display for AccentClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Flat => "flat",
            Self::HeadHigh => "head-high",
            Self::MiddleHigh => "middle-high",
            Self::TailHigh => "tail-high",
            Self::RisingFalling => "rising-falling",
        };
        write!(f, "{name} ({})", self.japanese_name())
    }
}

impl FromStr for AccentClass {
    type Err = PronunciationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" | "heiban" => Ok(Self::Flat),
            "head-high" | "atamadaka" => Ok(Self::HeadHigh),
            "middle-high" | "nakadaka" => Ok(Self::MiddleHigh),
            "tail-high" | "odaka" => Ok(Self::TailHigh),
            "rising-falling" | "kifuku" => Ok(Self::RisingFalling),
            other => Err(PronunciationError::new(format!(
                "unknown accent class \"{other}\""
            ))),
        }
    }
}

/// Accent class together with its drop position (0 for flat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accent {
    pub class: AccentClass,
    pub position: usize,
}

impl Accent {
    pub const FLAT: Self = Self {
        class: AccentClass::Flat,
        position: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchSymbol {
    High,
    Low,
}

impl PitchSymbol {
    pub fn as_char(self) -> char {
        match self {
            Self::High => 'H',
            Self::Low => 'L',
        }
    }
}

impl Serialize for PitchSymbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

impl Display for PitchSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One High/Low symbol per mora; serializes as a string such as `"LHHL"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PitchPattern(Vec<PitchSymbol>);

impl PitchPattern {
    pub fn new(symbols: Vec<PitchSymbol>) -> Self {
        Self(symbols)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[PitchSymbol] {
        &self.0
    }

    pub fn high_count(&self) -> usize {
        self.0.iter().filter(|&&s| s == PitchSymbol::High).count()
    }
}

impl Display for PitchPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|symbol| write!(f, "{symbol}"))
    }
}

impl Serialize for PitchPattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for PitchPattern {
    type Err = PronunciationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .chars()
            .map(|ch| match ch.to_ascii_uppercase() {
                'H' => Ok(PitchSymbol::High),
                'L' => Ok(PitchSymbol::Low),
                other => Err(PronunciationError::new(format!(
                    "invalid pitch symbol '{other}' in \"{value}\""
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Builds the pattern for a drop position: the first mora is low, morae
/// `1..position` are high, the rest low. Position 0 (flat) is all low.
pub fn synthesize_pattern(position: usize, mora_count: usize) -> PitchPattern {
    let symbols = (0..mora_count)
        .map(|index| {
            if index > 0 && index < position {
                PitchSymbol::High
            } else {
                PitchSymbol::Low
            }
        })
        .collect();
    PitchPattern(symbols)
}

/// Which resolution tier produced an [`AccentResolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentSource {
    Dictionary,
    Heuristic,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccentResolution {
    pub source: AccentSource,
    pub accent: Accent,
    pub pattern: PitchPattern,
}

impl AccentResolution {
    pub fn empty() -> Self {
        Self {
            source: AccentSource::Empty,
            accent: Accent::FLAT,
            pattern: PitchPattern::default(),
        }
    }
}

/// Resolves the expected accent of a phrase: dictionary entry first, then a
/// conservative flat fallback.
#[derive(Debug, Clone, Copy)]
pub struct AccentModel {
    dictionary: &'static AccentDictionary,
}

impl Default for AccentModel {
    fn default() -> Self {
        Self::new(AccentDictionary::shared())
    }
}

impl AccentModel {
    pub fn new(dictionary: &'static AccentDictionary) -> Self {
        Self { dictionary }
    }

    /// The returned pattern always has exactly `units.len()` symbols.
    pub fn derive_pattern(
        &self,
        units: &SoundUnitSequence,
        phrase: Option<&str>,
    ) -> AccentResolution {
        let mora_count = units.len();
        if mora_count == 0 {
            return AccentResolution::empty();
        }

        let reading = units.reading();
        let entry = phrase
            .and_then(|text| self.dictionary.lookup(text.trim()))
            .or_else(|| self.dictionary.lookup(&reading));

        let resolution = match entry {
            Some(entry) if entry.pattern.len() == mora_count => AccentResolution {
                source: AccentSource::Dictionary,
                accent: entry.accent,
                pattern: entry.pattern.clone(),
            },
            Some(entry) => {
                warn!(
                    reading = %reading,
                    dictionary_len = entry.pattern.len(),
                    mora_count,
                    "dictionary pattern length disagrees with mora count; resynthesizing"
                );
                AccentResolution {
                    source: AccentSource::Dictionary,
                    accent: entry.accent,
                    pattern: synthesize_pattern(entry.accent.position, mora_count),
                }
            }
            None => AccentResolution {
                source: AccentSource::Heuristic,
                accent: Accent::FLAT,
                pattern: synthesize_pattern(0, mora_count),
            },
        };
        debug!(
            reading = %reading,
            source = ?resolution.source,
            pattern = %resolution.pattern,
            "resolved pitch accent"
        );
        resolution
    }
}
