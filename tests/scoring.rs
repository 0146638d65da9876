use approx::assert_relative_eq;
use kotoba_coach::pronunciation::alignment::EditDistanceAligner;
use kotoba_coach::pronunciation::scoring::similarity_score;
use kotoba_coach::pronunciation::{
    analyze, AlignerKind, CompositeScorer, ContourStatus, EngineConfig, LabelBreakpoints,
    PitchContour, SimilarityLabel,
};

fn steady_voice() -> PitchContour {
    PitchContour::new(vec![150.0; 60])
}

#[test]
fn perfect_attempt_scores_one_hundred() {
    let report = analyze("こんにちは", "こんにちは", &steady_voice());
    assert_eq!(report.similarity_score, 100);
    assert_eq!(report.similarity_label, SimilarityLabel::Perfect);
    assert_relative_eq!(report.segmental.score, 100.0);
    assert_relative_eq!(report.pitch.score, 100.0);
    assert_eq!(report.overall_score, 100);
    assert!(!report.errors.has_errors);
    assert!(report.feedback.starts_with("Perfect!"));
}

#[test]
fn steady_voice_at_an_inexact_frequency_scores_full_pitch() {
    let report = analyze("こんにちは", "こんにちは", &PitchContour::new(vec![176.3; 250]));
    assert_relative_eq!(report.pitch.score, 100.0);
    assert_eq!(report.overall_score, 100);
}

#[test]
fn trailing_extra_mora() {
    let report = analyze("こんにちは", "こんにちはあ", &steady_voice());
    assert_eq!(report.similarity_score, 83);
    assert_eq!(report.errors.extra_count, 1);
    assert_eq!(report.errors.total_errors, 1);
    assert_relative_eq!(report.segmental.score, 500.0 / 6.0, epsilon = 1e-9);
    assert_eq!(report.overall_score, 90);
    assert_eq!(report.overall_label, SimilarityLabel::GreatJob);
    assert!(report.feedback.contains("You added 1 extra mora."));
}

#[test]
fn dropped_mora_with_the_default_positional_aligner() {
    let report = analyze("こんにちは", "こんちは", &steady_voice());
    assert_eq!(report.similarity_score, 80);
    assert_eq!(report.similarity_label, SimilarityLabel::GreatJob);
    assert_eq!(report.errors.missing_count, 1);
    assert_eq!(report.errors.substituted_count, 2);
    assert_eq!(report.overall_score, 64);
    assert_eq!(report.overall_label, SimilarityLabel::AlmostThere);
    assert!(report.feedback.starts_with("Great job!"));
}

#[test]
fn dropped_mora_with_edit_distance() {
    let config = EngineConfig {
        aligner: AlignerKind::EditDistance,
        ..EngineConfig::default()
    };
    let report = CompositeScorer::new(config).score("こんにちは", "こんちは", &steady_voice());
    assert_eq!(report.errors.segmental_error_count, 1);
    assert_eq!(report.errors.missing_count, 1);
    assert_eq!(report.overall_score, 88);

    let same = CompositeScorer::default()
        .with_aligner(EditDistanceAligner)
        .score("こんにちは", "こんちは", &steady_voice());
    assert_eq!(same.overall_score, report.overall_score);
}

#[test]
fn labels_follow_the_breakpoints() {
    let labels = LabelBreakpoints::default();
    assert_eq!(labels.label(96), SimilarityLabel::Perfect);
    assert_eq!(labels.label(95), SimilarityLabel::Perfect);
    assert_eq!(labels.label(85), SimilarityLabel::GreatJob);
    assert_eq!(labels.label(65), SimilarityLabel::AlmostThere);
    assert_eq!(labels.label(30), SimilarityLabel::NeedsPractice);
}

#[test]
fn similarity_is_character_level() {
    assert_eq!(similarity_score("こんちは", "こんにちは"), 80);
    assert_eq!(similarity_score("  こんにちは ", "こんにちは"), 100);
    assert_eq!(similarity_score("", ""), 100);
    assert_eq!(similarity_score("", "こんにちは"), 0);
}

#[test]
fn missing_contour_zeroes_only_pitch() {
    let report = analyze("こんにちは", "こんにちは", &PitchContour::default());
    assert_eq!(report.pitch.diff.status, ContourStatus::EmptyInput);
    assert_eq!(report.pitch.score, 0.0);
    assert_eq!(report.overall_score, 60);
    assert!(!report.is_degraded());
    assert!(report.feedback.contains("Unable to analyze pitch"));
}

#[test]
fn katakana_transcription_matches_hiragana_target() {
    let report = analyze("こんにちは", "コンニチハ", &steady_voice());
    assert_relative_eq!(report.segmental.score, 100.0);
    assert_eq!(report.errors.segmental_error_count, 0);
}

#[test]
fn kanji_target_is_read_through_the_lexicon() {
    let report = analyze("今日は", "こんにちは", &steady_voice());
    assert_eq!(report.segmental.expected_units.reading(), "こんにちは");
    assert_relative_eq!(report.segmental.score, 100.0);
    assert_eq!(report.overall_score, 100);
}

#[test]
fn unreadable_text_degrades_the_report() {
    let report = analyze("猫", "ねこ", &steady_voice());
    assert!(report.is_degraded());
    assert_eq!(report.segmental.score, 0.0);
    assert_eq!(report.pitch.diff.status, ContourStatus::Failed);
    assert_eq!(report.overall_score, 0);
    assert_eq!(report.overall_label, SimilarityLabel::NeedsPractice);
    assert!(report.feedback.contains("Analysis incomplete"));
}

#[test]
fn report_serializes_with_label_text() {
    let report = analyze("ありがとう", "ありがとう", &steady_voice());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["overall_label"], "Great job!");
    assert_eq!(json["pitch"]["accent"]["pattern"], "LHLLL");
    assert_eq!(json["segmental"]["expected_units"][0], "あ");
}
