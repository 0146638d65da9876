use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::pronunciation::{PronunciationError, Result};

use super::{Accent, AccentClass, PitchPattern};

const RAW_ACCENTS: &str = include_str!("../../../assets/accent/accents.txt");

/// Shared dictionary instance backed by the bundled accent table.
pub static DEFAULT_ACCENTS: Lazy<AccentDictionary> = Lazy::new(|| {
    AccentDictionary::from_source(RAW_ACCENTS)
        .unwrap_or_else(|err| panic!("failed to initialize accent dictionary: {err}"))
});

#[derive(Debug, Clone, PartialEq)]
pub struct AccentEntry {
    pub accent: Accent,
    pub pattern: PitchPattern,
    pub gloss: Option<String>,
}

/// A key defined more than once; the later entry is the one kept.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCollision {
    pub phrase: String,
    pub replaced: AccentEntry,
    pub line: usize,
}

/// Curated phrase → accent table. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct AccentDictionary {
    entries: HashMap<String, AccentEntry>,
    collisions: Vec<KeyCollision>,
    class_conflicts: Vec<String>,
}

impl AccentDictionary {
    /// Parses `phrase class drop pattern [gloss]` lines; `;` starts a comment.
    pub fn from_source(data: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut collisions = Vec::new();
        let mut class_conflicts = Vec::new();

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let columns: Vec<&str> = trimmed.split_whitespace().collect();
            let [phrase, class, drop_column, pattern, rest @ ..] = columns.as_slice() else {
                return Err(PronunciationError::new(format!(
                    "accent line {idx} needs phrase, class, drop and pattern: {trimmed}"
                )));
            };
            let class: AccentClass = class.parse()?;
            let position: usize = drop_column.parse().map_err(|_| {
                PronunciationError::new(format!(
                    "accent line {idx} has invalid drop \"{drop_column}\""
                ))
            })?;
            let pattern: PitchPattern = pattern.parse()?;
            if pattern.is_empty() {
                return Err(PronunciationError::new(format!(
                    "accent line {idx} has an empty pattern"
                )));
            }

            let implied = AccentClass::from_drop(position, pattern.len());
            if class != AccentClass::RisingFalling && class != implied {
                warn!(
                    phrase,
                    line = idx,
                    %class,
                    %implied,
                    "accent class disagrees with its drop position"
                );
                class_conflicts.push(phrase.to_string());
            }

            let entry = AccentEntry {
                accent: Accent { class, position },
                pattern,
                gloss: (!rest.is_empty()).then(|| rest.join(" ")),
            };
            if let Some(replaced) = entries.insert(phrase.to_string(), entry) {
                warn!(phrase, line = idx, "duplicate accent key; later entry wins");
                collisions.push(KeyCollision {
                    phrase: phrase.to_string(),
                    replaced,
                    line: idx,
                });
            }
        }

        if entries.is_empty() {
            return Err(PronunciationError::new(
                "bundled accent dictionary contained no entries",
            ));
        }

        Ok(Self {
            entries,
            collisions,
            class_conflicts,
        })
    }

    /// Returns a handle to the globally shared dictionary.
    pub fn shared() -> &'static Self {
        &DEFAULT_ACCENTS
    }

    pub fn lookup(&self, phrase: &str) -> Option<&AccentEntry> {
        self.entries.get(phrase)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }

    /// Phrases whose class column contradicts their drop position.
    pub fn class_conflicts(&self) -> &[String] {
        &self.class_conflicts
    }
}
