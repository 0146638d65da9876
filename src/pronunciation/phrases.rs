//! Bundled practice phrases.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::pronunciation::{PronunciationError, Result};

const RAW_PHRASES: &str = include_str!("../../assets/phrases.json");

pub static DEFAULT_PHRASES: Lazy<PhraseCatalog> = Lazy::new(|| {
    PhraseCatalog::from_json(RAW_PHRASES)
        .unwrap_or_else(|err| panic!("failed to initialize phrase catalog: {err}"))
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: String,
    pub text: String,
    pub romaji: String,
    pub translation: String,
    pub audio_url: String,
}

#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    phrases: Vec<Phrase>,
}

impl PhraseCatalog {
    pub fn from_json(data: &str) -> Result<Self> {
        let phrases: Vec<Phrase> = serde_json::from_str(data)
            .map_err(|err| PronunciationError::new(format!("invalid phrase catalog: {err}")))?;
        for (idx, phrase) in phrases.iter().enumerate() {
            if phrases[..idx].iter().any(|other| other.id == phrase.id) {
                return Err(PronunciationError::new(format!(
                    "duplicate phrase id \"{}\"",
                    phrase.id
                )));
            }
        }
        Ok(Self { phrases })
    }

    pub fn shared() -> &'static Self {
        &DEFAULT_PHRASES
    }

    pub fn all(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn lookup(&self, id: &str) -> Result<&Phrase> {
        self.phrases
            .iter()
            .find(|phrase| phrase.id == id)
            .ok_or_else(|| PronunciationError::new(format!("unknown phrase id \"{id}\"")))
    }
}
