use kotoba_coach::pronunciation::alignment::{EditDistanceAligner, PositionalAligner};
use kotoba_coach::pronunciation::{
    KanaMoraExtractor, Result, SegmentalAligner, SegmentalErrorKind, SoundUnitExtractor,
    SoundUnitSequence,
};

fn morae(text: &str) -> Result<SoundUnitSequence> {
    KanaMoraExtractor::new().extract(text)
}

fn aligners() -> Vec<(&'static str, Box<dyn SegmentalAligner>)> {
    vec![
        ("positional", Box::new(PositionalAligner)),
        ("edit-distance", Box::new(EditDistanceAligner)),
    ]
}

#[test]
fn identical_sequences_have_no_errors() -> Result<()> {
    let units = morae("おはようございます")?;
    for (name, aligner) in aligners() {
        let diff = aligner.align(&units, &units);
        assert!(diff.errors.is_empty(), "{name} reported errors");
        assert_eq!(diff.correct, 9, "{name}");
        assert_eq!(diff.accuracy, 1.0, "{name}");
    }
    Ok(())
}

#[test]
fn empty_against_empty_is_accurate() {
    let empty = SoundUnitSequence::default();
    for (name, aligner) in aligners() {
        let diff = aligner.align(&empty, &empty);
        assert!(diff.errors.is_empty(), "{name}");
        assert_eq!(diff.accuracy, 1.0, "{name}");
    }
}

#[test]
fn everything_missing_when_nothing_was_said() -> Result<()> {
    let expected = morae("こんばんは")?;
    for (name, aligner) in aligners() {
        let diff = aligner.align(&expected, &SoundUnitSequence::default());
        assert_eq!(diff.missing_count(), 5, "{name}");
        assert_eq!(diff.accuracy, 0.0, "{name}");
    }
    Ok(())
}

#[test]
fn trailing_extra_mora_is_reported_at_the_end() -> Result<()> {
    let expected = morae("こんにちは")?;
    let actual = morae("こんにちはあ")?;
    for (name, aligner) in aligners() {
        let diff = aligner.align(&expected, &actual);
        assert_eq!(diff.errors.len(), 1, "{name}");
        let error = &diff.errors[0];
        assert_eq!(error.kind, SegmentalErrorKind::Extra, "{name}");
        assert_eq!(error.position, 5, "{name}");
        assert_eq!(error.actual.as_ref().map(|u| u.as_str()), Some("あ"));
        assert!((diff.accuracy - 5.0 / 6.0).abs() < 1e-9, "{name}");
    }
    Ok(())
}

#[test]
fn positional_drop_cascades_but_edit_distance_isolates_it() -> Result<()> {
    let expected = morae("こんにちは")?;
    let actual = morae("こんちは")?;

    let positional = PositionalAligner.align(&expected, &actual);
    assert_eq!(positional.substituted_count(), 2);
    assert_eq!(positional.missing_count(), 1);
    assert!((positional.accuracy - 0.4).abs() < 1e-9);

    let edit = EditDistanceAligner.align(&expected, &actual);
    assert_eq!(edit.errors.len(), 1);
    assert_eq!(edit.errors[0].kind, SegmentalErrorKind::Missing);
    assert_eq!(edit.errors[0].position, 2);
    assert!((edit.accuracy - 0.8).abs() < 1e-9);
    Ok(())
}

#[test]
fn swapping_inputs_swaps_missing_and_extra() -> Result<()> {
    let pairs = [("こんにちは", "こんちは"), ("ありがとう", "ありがと"), ("せんせい", "せんせいい")];
    for (lhs, rhs) in pairs {
        let lhs = morae(lhs)?;
        let rhs = morae(rhs)?;
        for (name, aligner) in aligners() {
            let forward = aligner.align(&lhs, &rhs);
            let backward = aligner.align(&rhs, &lhs);
            assert_eq!(forward.missing_count(), backward.extra_count(), "{name}");
            assert_eq!(forward.extra_count(), backward.missing_count(), "{name}");
            assert_eq!(
                forward.substituted_count(),
                backward.substituted_count(),
                "{name}"
            );
        }
    }
    Ok(())
}

#[test]
fn small_kana_stay_inside_their_mora() -> Result<()> {
    let expected = morae("きょう")?;
    let actual = morae("きよう")?;
    assert_eq!(expected.len(), 2);
    let diff = EditDistanceAligner.align(&expected, &actual);
    assert_eq!(diff.substituted_count(), 1);
    assert_eq!(diff.extra_count(), 1);
    Ok(())
}
