use crate::pronunciation::{ContourStatus, PitchDiff, SegmentalDiff, SimilarityLabel};

const PERFECT_SENTENCE: &str = "Both the morae and the pitch accent were spot on.";

/// `1 mora`, `3 morae`.
pub(crate) fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn tier_sentence(label: SimilarityLabel) -> &'static str {
    match label {
        SimilarityLabel::Perfect => "Perfect! Your pronunciation matched the phrase.",
        SimilarityLabel::GreatJob => "Great job! You were very close.",
        SimilarityLabel::AlmostThere => "Almost there! A few sounds need attention.",
        SimilarityLabel::NeedsPractice => {
            "Needs practice. Listen to the phrase again and repeat it slowly."
        }
    }
}

/// Leads with the similarity tier, then one clause per error category, then
/// any collaborator failures.
pub fn compose(
    label: SimilarityLabel,
    segmental: &SegmentalDiff,
    pitch: &PitchDiff,
    failures: &[String],
) -> String {
    let mut sentences = vec![tier_sentence(label).to_string()];
    sentences.extend(segmental.clauses());
    sentences.extend(pitch.clauses());
    if matches!(
        pitch.status,
        ContourStatus::EmptyInput | ContourStatus::Unvoiced
    ) {
        sentences.push(pitch.feedback.clone());
    }
    if sentences.len() == 1 && failures.is_empty() {
        sentences.push(PERFECT_SENTENCE.to_string());
    }
    sentences.extend(
        failures
            .iter()
            .map(|reason| format!("Analysis incomplete: {reason}.")),
    );
    sentences.join(" ")
}
