//! Mora-level sound units and the extractor boundary that produces them.

mod kana;
pub mod lexicon;

pub use kana::KanaMoraExtractor;

use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::pronunciation::Result;

/// One mora, stored as its normalized kana spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SoundUnit(String);

impl SoundUnit {
    pub fn new(unit: impl Into<String>) -> Self {
        Self(unit.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SoundUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SoundUnit {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Immutable ordered run of morae; `len()` is the mora count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundUnitSequence {
    units: Arc<[SoundUnit]>,
}

impl SoundUnitSequence {
    pub fn new(units: Vec<SoundUnit>) -> Self {
        Self {
            units: Arc::from(units),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SoundUnit> {
        self.units.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SoundUnit> {
        self.units.iter()
    }

    pub fn as_slice(&self) -> &[SoundUnit] {
        &self.units
    }

    /// Concatenates the morae back into a single kana reading.
    pub fn reading(&self) -> String {
        self.units.iter().map(SoundUnit::as_str).collect()
    }
}

impl Default for SoundUnitSequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Index<usize> for SoundUnitSequence {
    type Output = SoundUnit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.units[index]
    }
}

impl FromIterator<SoundUnit> for SoundUnitSequence {
    fn from_iter<I: IntoIterator<Item = SoundUnit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SoundUnitSequence {
    type Item = &'a SoundUnit;
    type IntoIter = std::slice::Iter<'a, SoundUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl Serialize for SoundUnitSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.units.iter())
    }
}

/// Grapheme-to-mora boundary. Must be deterministic for a given text, since
/// the same extractor runs over both the reference phrase and the transcription.
pub trait SoundUnitExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<SoundUnitSequence>;
}
