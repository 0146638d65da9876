use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::pronunciation::EngineConfig;

/// Engine settings file, relative to the assets root.
pub const ENGINE_CONFIG_PATH: &str = "config/engine.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assets_root: PathBuf,
}

impl AppConfig {
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let root = match path {
            Some(custom) => canonicalize_dir(&custom)?,
            None => default_assets_root()?,
        };
        Ok(Self { assets_root: root })
    }

    /// Reads `config/engine.json` under the assets root; defaults when absent.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        load_engine_config(&self.assets_root)
    }
}

pub fn load_engine_config(assets_root: &Path) -> Result<EngineConfig> {
    let path = assets_root.join(ENGINE_CONFIG_PATH);
    if !path.is_file() {
        debug!(?path, "no engine config found; using defaults");
        return Ok(EngineConfig::default());
    }
    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read engine config {:?}", path))?;
    parse_engine_config(&data).with_context(|| format!("invalid engine config {:?}", path))
}

pub fn parse_engine_config(raw: &str) -> Result<EngineConfig> {
    let config: EngineConfig =
        serde_json::from_str(raw).context("failed to parse engine config JSON")?;
    let weights = config.weights;
    anyhow::ensure!(
        weights.segmental >= 0.0 && weights.pitch >= 0.0,
        "scoring weights must be non-negative"
    );
    let labels = config.labels;
    anyhow::ensure!(
        labels.perfect >= labels.great && labels.great >= labels.almost,
        "label breakpoints must descend: perfect >= great >= almost"
    );
    Ok(config)
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("failed to resolve assets directory at {:?}", path))?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(anyhow!("assets path {:?} is not a directory", canonical))
    }
}

fn default_assets_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("unable to resolve current executable path")?;
    let assets = exe
        .ancestors()
        .find_map(|dir| {
            let candidate = dir.join("assets");
            candidate.is_dir().then_some(candidate)
        })
        .ok_or_else(|| anyhow!("could not locate default assets directory alongside binary"))?;
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::{default_assets_root, load_engine_config, parse_engine_config, AppConfig};
    use crate::pronunciation::{AlignerKind, EngineConfig};

    #[test]
    fn discovers_assets_root() {
        let root = default_assets_root().expect("assets directory should exist");
        assert!(root.ends_with("assets"));
    }

    #[test]
    fn accepts_override() {
        let config =
            AppConfig::from_override(Some(std::env::current_dir().unwrap().join("assets")))
                .unwrap();
        assert!(config.assets_root.ends_with("assets"));
    }

    #[test]
    fn bundled_engine_config_matches_defaults() {
        let assets = std::env::current_dir().unwrap().join("assets");
        let config = AppConfig::from_override(Some(assets))
            .unwrap()
            .engine_config()
            .unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_engine_config(dir.path()).unwrap();
        assert_eq!(config.aligner, AlignerKind::Positional);
    }

    #[test]
    fn rejects_inverted_breakpoints() {
        let raw = r#"{"labels":{"perfect":50,"great":80,"almost":60}}"#;
        assert!(parse_engine_config(raw).is_err());
        assert!(parse_engine_config(r#"{"weights":{"pitch":-1.0}}"#).is_err());
    }
}
