use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kotoba_coach::config::AppConfig;
use kotoba_coach::pronunciation::cli::{AnalyzeArgs, Cli, Command, ContourArgs, PatternArgs};
use kotoba_coach::pronunciation::contour::{PitchExtractor, PyinPitchExtractor};
use kotoba_coach::pronunciation::phrases::PhraseCatalog;
use kotoba_coach::pronunciation::{
    AccentModel, CompositeScorer, KanaMoraExtractor, PitchContour, SoundUnitExtractor,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Pattern(args) => handle_pattern(&args),
        Command::Phrases(output) => emit(PhraseCatalog::shared().all(), output.pretty),
        Command::Contour(args) => handle_contour(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let assets = AppConfig::from_override(args.assets_path.clone())?;
    let mut config = assets.engine_config()?;
    if let Some(aligner) = args.aligner {
        config.aligner = aligner;
    }

    let phrase = args.target_phrase(PhraseCatalog::shared())?;
    let contour = match (&args.contour, &args.audio) {
        (Some(path), _) => Ok(read_contour(path)?),
        (None, Some(path)) => PyinPitchExtractor.extract(path),
        (None, None) => Ok(PitchContour::default()),
    };

    let scorer = CompositeScorer::new(config);
    let report = scorer.score_with_pitch(
        &phrase,
        &args.transcription,
        contour.as_ref().map_err(|err| err.clone()),
    );
    info!(
        overall = report.overall_score,
        degraded = report.is_degraded(),
        "analysis complete"
    );
    emit(&report, args.output.pretty)
}

fn handle_pattern(args: &PatternArgs) -> Result<()> {
    let units = KanaMoraExtractor::new().extract(&args.phrase)?;
    let resolution = AccentModel::default().derive_pattern(&units, Some(&args.phrase));
    let output = serde_json::json!({
        "phrase": args.phrase,
        "morae": units,
        "mora_count": units.len(),
        "accent": resolution,
    });
    emit(&output, args.output.pretty)
}

fn handle_contour(args: &ContourArgs) -> Result<()> {
    let contour = PyinPitchExtractor.extract(&args.audio)?;
    emit(&contour, args.output.pretty)
}

fn read_contour(path: &Path) -> Result<PitchContour> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read pitch contour {:?}", path))?;
    let contour: PitchContour =
        serde_json::from_str(&data).context("failed to parse pitch contour JSON")?;
    Ok(contour)
}

fn emit<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
