use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::pronunciation::{PronunciationError, Result};

use super::kana::is_kana;

const RAW_READINGS: &str = include_str!("../../../assets/lexicon/readings.txt");

/// Shared lexicon instance backed by the bundled surface → kana readings.
pub static DEFAULT_LEXICON: Lazy<ReadingLexicon> = Lazy::new(|| {
    ReadingLexicon::from_source(RAW_READINGS)
        .unwrap_or_else(|err| panic!("failed to initialize reading lexicon: {err}"))
});

/// Kana readings for surface forms (usually kanji) a transcriber may emit.
#[derive(Debug, Clone)]
pub struct ReadingLexicon {
    entries: HashMap<String, String>,
    longest_key: usize,
}

impl ReadingLexicon {
    /// Parses `surface reading` lines; `;` starts a comment line.
    pub fn from_source(data: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut longest_key = 0;

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let surface = parts.next().ok_or_else(|| {
                PronunciationError::new(format!("lexicon line {idx} missing surface column"))
            })?;
            let reading = parts.next().ok_or_else(|| {
                PronunciationError::new(format!(
                    "lexicon line {idx} missing reading for {surface}"
                ))
            })?;
            if !reading.chars().all(is_kana) {
                return Err(PronunciationError::new(format!(
                    "lexicon line {idx} reading \"{reading}\" is not kana"
                )));
            }

            longest_key = longest_key.max(surface.chars().count());
            if let Some(previous) = entries.insert(surface.to_string(), reading.to_string()) {
                warn!(surface, previous = %previous, reading, "duplicate lexicon entry replaced");
            }
        }

        if entries.is_empty() {
            return Err(PronunciationError::new(
                "bundled reading lexicon contained no entries",
            ));
        }

        Ok(Self {
            entries,
            longest_key,
        })
    }

    /// Returns a handle to the globally shared lexicon.
    pub fn shared() -> &'static Self {
        &DEFAULT_LEXICON
    }

    pub fn lookup(&self, surface: &str) -> Option<&str> {
        self.entries.get(surface).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces known surface forms with their readings, longest match first.
    /// Characters with no entry pass through unchanged.
    pub fn transliterate(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut output = String::with_capacity(text.len());
        let mut index = 0;
        while index < chars.len() {
            let window = self.longest_key.min(chars.len() - index);
            let matched = (1..=window).rev().find_map(|span| {
                let candidate: String = chars[index..index + span].iter().collect();
                self.lookup(&candidate).map(|reading| (span, reading))
            });
            match matched {
                Some((span, reading)) => {
                    output.push_str(reading);
                    index += span;
                }
                None => {
                    output.push(chars[index]);
                    index += 1;
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::ReadingLexicon;

    #[test]
    fn prefers_longest_surface_match() {
        let lexicon = ReadingLexicon::from_source("今日 きょう\n今日は こんにちは\n").unwrap();
        assert_eq!(lexicon.transliterate("今日は"), "こんにちは");
        assert_eq!(lexicon.transliterate("今日も"), "きょうも");
    }

    #[test]
    fn rejects_non_kana_readings() {
        let error = ReadingLexicon::from_source("橋 hashi\n").unwrap_err();
        assert!(error.to_string().contains("not kana"), "{error}");
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let lexicon = ReadingLexicon::from_source("端 はし\n端 はた\n").unwrap();
        assert_eq!(lexicon.lookup("端"), Some("はた"));
        assert_eq!(lexicon.len(), 1);
    }
}
