use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::pronunciation::phrases::PhraseCatalog;
use crate::pronunciation::AlignerKind;

#[derive(Parser, Debug)]
#[command(
    name = "kotoba-coach",
    version,
    about = "Score Japanese pronunciation attempts by mora and pitch accent"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a transcription and pitch contour against a target phrase.
    Analyze(AnalyzeArgs),
    /// Print the morae and expected accent pattern of a phrase.
    Pattern(PatternArgs),
    /// List the bundled practice phrases.
    Phrases(OutputArgs),
    /// Extract a pitch contour from an audio file.
    Contour(ContourArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("target").required(true).args(["phrase", "phrase_id"])))]
pub struct AnalyzeArgs {
    /// Target phrase text.
    #[arg(long)]
    pub phrase: Option<String>,
    /// Id of a bundled practice phrase.
    #[arg(long = "phrase-id")]
    pub phrase_id: Option<String>,
    /// What the speech recognizer heard.
    #[arg(long)]
    pub transcription: String,
    /// JSON array of F0 values in Hz (0 for unvoiced frames).
    #[arg(long, value_name = "PATH", conflicts_with = "audio")]
    pub contour: Option<PathBuf>,
    /// Recording to extract the pitch contour from.
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,
    /// Override the aligner selected in the engine config.
    #[arg(long, value_enum)]
    pub aligner: Option<AlignerKind>,
    /// Optional override for the assets directory.
    #[arg(long = "assets-path")]
    pub assets_path: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

impl AnalyzeArgs {
    /// Resolves `--phrase` or `--phrase-id` to the target text.
    pub fn target_phrase(&self, catalog: &PhraseCatalog) -> Result<String> {
        match (&self.phrase, &self.phrase_id) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(id)) => Ok(catalog.lookup(id)?.text.clone()),
            (None, None) => anyhow::bail!("provide --phrase or --phrase-id"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PatternArgs {
    /// Phrase to resolve.
    pub phrase: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ContourArgs {
    /// Recording to analyze (WAV, MP3, FLAC, OGG, ...).
    #[arg(long, value_name = "PATH")]
    pub audio: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}
