//! Pipeline configuration: parsing, normalization, and loading.
//!
//! The TOML file describes:
//! - The entities to collect (`[entities.CODE]` with display name and store id)
//! - Collection settings (`[collection]`)
//! - Keyword extraction settings (`[analysis]`)
//! - Input/output locations (`[paths]`)
//! - An optional theme dictionary (`[themes]`); the built-in banking
//!   dictionary is used when it is absent
//!
//! Key behaviors:
//! - Entity order in the file is the collection order.
//! - Normalization trims entity codes, names and store ids, and rejects empty
//!   or duplicate codes and empty store ids.
//! - Theme tables go through [`ThemeDictionary::new`], which trims, lowercases
//!   and de-duplicates keywords per theme while preserving order.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use std::{
    mem,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use indexmap::IndexMap;
use review_ingestor::{CollectConfig, EntityDescriptor};
use review_insights::{AnalysisOptions, KeywordConfig, ThemeDictionary};
use serde::{Deserialize, Serialize};
use toml::from_str;
use tracing::debug;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Map of entity code -> entity configuration, in collection order.
    pub entities: IndexMap<String, EntityCfg>,
    #[serde(default)]
    pub collection: CollectConfig,
    #[serde(default)]
    pub analysis: KeywordConfig,
    #[serde(default)]
    pub paths: PathsCfg,
    /// Theme label -> trigger keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<IndexMap<String, Vec<String>>>,
}

/// One reviewed application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EntityCfg {
    /// Human-readable name (e.g., "Commercial Bank of Ethiopia").
    pub name: String,
    /// Store identifier (e.g., "com.combanketh.mobilebanking").
    pub source_id: String,
}

/// File locations used by the `collect` and `analyze` commands.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsCfg {
    pub raw_dir: PathBuf,
    /// Collected reviews.
    pub raw_reviews: PathBuf,
    /// App listing metadata.
    pub app_info: PathBuf,
    /// Preprocessed reviews; preferred analysis input when the file exists.
    pub processed_reviews: PathBuf,
    /// Analysis output.
    pub sentiment_output: PathBuf,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            raw_reviews: PathBuf::from("data/raw/play_reviews_raw.csv"),
            app_info: PathBuf::from("data/raw/app_info.csv"),
            processed_reviews: PathBuf::from("data/processed/play_reviews_processed.csv"),
            sentiment_output: PathBuf::from("data/processed/sentiment_analysis.csv"),
        }
    }
}

impl PathsCfg {
    /// Processed reviews if present, otherwise the raw collection output.
    pub fn analysis_input(&self) -> &Path {
        if self.processed_reviews.is_file() {
            &self.processed_reviews
        } else {
            &self.raw_reviews
        }
    }
}

impl PipelineConfig {
    /// Entity descriptors in configuration order.
    pub fn entities(&self) -> Vec<EntityDescriptor> {
        self.entities
            .iter()
            .map(|(code, cfg)| EntityDescriptor::new(code.as_str(), cfg.name.as_str(), cfg.source_id.as_str()))
            .collect()
    }

    pub fn theme_dictionary(&self) -> ThemeDictionary {
        self.themes
            .clone()
            .map(ThemeDictionary::from)
            .unwrap_or_default()
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            keywords: self.analysis,
            themes: self.theme_dictionary(),
        }
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, Serialize)]
pub struct NormalizationReport {
    /// Number of entity keys that changed when trimming.
    pub entities_renamed: usize,
    /// Entities whose empty name was replaced by their code.
    pub names_defaulted: usize,
    /// Count of removed duplicate theme keywords.
    pub theme_keywords_deduped: usize,
}

/// Normalize a configuration in place.
///
/// What normalization does:
/// - Trim entity keys; reject empty or duplicate codes after trimming
/// - Trim names (an empty name falls back to the code) and store ids
///   (an empty store id is an error)
/// - Trim + lowercase theme keywords, dropping blanks and duplicates
///
/// Errors:
/// - No entities configured
/// - Empty or duplicate entity codes, empty store ids
/// - `reviews_per_bank` of zero
/// - Empty theme labels
pub fn normalize_config(cfg: &mut PipelineConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    if cfg.entities.is_empty() {
        bail!("at least one entity must be configured");
    }
    if cfg.collection.reviews_per_bank == 0 {
        bail!("collection.reviews_per_bank must be greater than zero");
    }

    let mut rebuilt: IndexMap<String, EntityCfg> = IndexMap::new();
    for (raw_code, mut entity) in mem::take(&mut cfg.entities) {
        let code = raw_code.trim().to_string();
        if code.is_empty() {
            bail!("entity code cannot be empty after trimming");
        }
        if code != raw_code {
            report.entities_renamed += 1;
        }
        if rebuilt.contains_key(&code) {
            bail!("duplicate entity code after normalization: {code}");
        }

        entity.source_id = entity.source_id.trim().to_string();
        if entity.source_id.is_empty() {
            bail!("entity '{code}' has an empty source_id");
        }
        entity.name = entity.name.trim().to_string();
        if entity.name.is_empty() {
            entity.name = code.clone();
            report.names_defaulted += 1;
        }

        rebuilt.insert(code, entity);
    }
    cfg.entities = rebuilt;

    if let Some(themes) = cfg.themes.take() {
        if themes.keys().any(|label| label.trim().is_empty()) {
            bail!("theme label cannot be empty after trimming");
        }
        let supplied: usize = themes
            .values()
            .flatten()
            .filter(|keyword| !keyword.trim().is_empty())
            .count();

        let dictionary = ThemeDictionary::new(themes);
        let kept: usize = dictionary
            .labels()
            .filter_map(|label| dictionary.triggers(label))
            .map(<[String]>::len)
            .sum();
        report.theme_keywords_deduped = supplied - kept;
        cfg.themes = Some(dictionary.into());
    }

    Ok(report)
}

/// Parse and normalize a configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<PipelineConfig> {
    let mut cfg: PipelineConfig = from_str(toml_str).context("failed to parse pipeline TOML")?;
    let report = normalize_config(&mut cfg).context("normalize_config failed")?;
    debug!(?report, entities = cfg.entities.len(), "loaded pipeline config");
    Ok(cfg)
}

/// Read a configuration TOML file from disk, parse, and normalize it.
///
/// See [`load_config_str`] for details on parsing and normalization.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<PipelineConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
