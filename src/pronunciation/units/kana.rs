use tracing::debug;

use crate::pronunciation::{PronunciationError, Result};

use super::lexicon::ReadingLexicon;
use super::{SoundUnit, SoundUnitExtractor, SoundUnitSequence};

const KATAKANA_OFFSET: u32 = 0x60;
const CHOONPU: char = 'ー';

/// Splits kana text into morae. Kanji covered by the reading lexicon are
/// transliterated first; anything else that is not kana is rejected.
#[derive(Debug, Clone)]
pub struct KanaMoraExtractor {
    lexicon: &'static ReadingLexicon,
    fold_katakana: bool,
}

impl Default for KanaMoraExtractor {
    fn default() -> Self {
        Self::with_lexicon(ReadingLexicon::shared())
    }
}

impl KanaMoraExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon(lexicon: &'static ReadingLexicon) -> Self {
        Self {
            lexicon,
            fold_katakana: true,
        }
    }

    /// Keeps katakana morae distinct from their hiragana counterparts.
    pub fn preserve_katakana(mut self) -> Self {
        self.fold_katakana = false;
        self
    }
}

impl SoundUnitExtractor for KanaMoraExtractor {
    fn extract(&self, text: &str) -> Result<SoundUnitSequence> {
        let reading = self.lexicon.transliterate(text);
        let mut morae: Vec<String> = Vec::with_capacity(reading.chars().count());

        for raw in reading.chars() {
            if is_ignorable(raw) {
                continue;
            }
            let ch = if self.fold_katakana {
                fold_katakana(raw)
            } else {
                raw
            };
            if !is_kana(ch) {
                return Err(PronunciationError::new(format!(
                    "no kana reading for '{ch}' in \"{text}\""
                )));
            }
            if is_small_kana(ch) {
                if let Some(previous) = morae.last_mut() {
                    previous.push(ch);
                    continue;
                }
            }
            morae.push(ch.to_string());
        }

        debug!(text, morae = morae.len(), "extracted morae");
        Ok(morae.into_iter().map(SoundUnit::new).collect())
    }
}

pub(crate) fn is_kana(ch: char) -> bool {
    matches!(ch, '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}')
        || matches!(ch, '\u{30A1}'..='\u{30FA}' | '\u{30FD}'..='\u{30FE}')
        || ch == CHOONPU
}

fn is_small_kana(ch: char) -> bool {
    matches!(
        ch,
        'ゃ' | 'ゅ' | 'ょ' | 'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'ゎ'
            | 'ャ' | 'ュ' | 'ョ' | 'ァ' | 'ィ' | 'ゥ' | 'ェ' | 'ォ' | 'ヮ'
    )
}

fn fold_katakana(ch: char) -> char {
    match ch {
        '\u{30A1}'..='\u{30F6}' | '\u{30FD}'..='\u{30FE}' => {
            char::from_u32(ch as u32 - KATAKANA_OFFSET).unwrap_or(ch)
        }
        _ => ch,
    }
}

fn is_ignorable(ch: char) -> bool {
    ch.is_whitespace()
        || ch.is_ascii_punctuation()
        || matches!(
            ch,
            '。' | '、' | '！' | '？' | '「' | '」' | '『' | '』' | '（' | '）' | '・' | '…'
                | '〜' | '～' | '，' | '．'
        )
}

#[cfg(test)]
mod tests {
    use super::{fold_katakana, KanaMoraExtractor};
    use crate::pronunciation::SoundUnitExtractor;

    fn morae(text: &str) -> Vec<String> {
        KanaMoraExtractor::new()
            .extract(text)
            .unwrap()
            .iter()
            .map(|unit| unit.to_string())
            .collect()
    }

    #[test]
    fn small_kana_join_the_preceding_mora() {
        assert_eq!(morae("きょう"), ["きょ", "う"]);
        assert_eq!(morae("しゃしん"), ["しゃ", "し", "ん"]);
    }

    #[test]
    fn sokuon_and_long_vowel_mark_are_their_own_morae() {
        assert_eq!(morae("がっこう"), ["が", "っ", "こ", "う"]);
        assert_eq!(morae("コーヒー"), ["こ", "ー", "ひ", "ー"]);
    }

    #[test]
    fn punctuation_and_spaces_are_dropped() {
        assert_eq!(morae(" こんにちは。"), ["こ", "ん", "に", "ち", "は"]);
    }

    #[test]
    fn katakana_can_be_preserved() {
        let units = KanaMoraExtractor::new()
            .preserve_katakana()
            .extract("テスト")
            .unwrap();
        assert_eq!(units.reading(), "テスト");
        assert_eq!(fold_katakana('テ'), 'て');
    }

    #[test]
    fn unknown_kanji_is_an_error() {
        let error = KanaMoraExtractor::new().extract("猫です").unwrap_err();
        assert!(error.to_string().contains("no kana reading"), "{error}");
    }
}
