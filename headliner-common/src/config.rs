//! Configuration loading and config file resolution
//!
//! Every section of the TOML file is optional. Missing sections and keys
//! fall back to the built-in defaults, which reproduce the dashboard's
//! choices (Sabrina Carpenter as reference, top 20 overview, ...).
//!
//! # Config File Priority
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`HEADLINER_CONFIG`)
//! 3. Platform config directory (`<config_dir>/headliner/config.toml`)
//! 4. Compiled defaults (no file)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "HEADLINER_CONFIG";

/// Top-level configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct TomlConfig {
    /// Source table locations
    #[serde(default)]
    pub data: DataConfig,

    /// Ranking score weights and overview size
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Which artists are fed to the cluster assigner
    #[serde(default)]
    pub cohort: CohortConfig,

    /// Nearest-neighbor lookup parameters
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Headliner/opener comparison parameters
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Decision matrix criterion weights
    #[serde(default)]
    pub decision: DecisionWeights,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source table locations
///
/// When a path is absent the engine uses its built-in tables.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct DataConfig {
    /// CSV with `artists,frequency,rank_sum,rank` columns
    #[serde(default)]
    pub artist_scores: Option<PathBuf>,

    /// CSV with `Artists`, the eight audio features and the fee column
    #[serde(default)]
    pub features: Option<PathBuf>,
}

/// Ranking score composition
///
/// `ranking_score = scale * (frequency_weight * f + rank_sum_weight * r)`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RankingConfig {
    #[serde(default = "default_half")]
    pub frequency_weight: f64,

    #[serde(default = "default_half")]
    pub rank_sum_weight: f64,

    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Number of artists in the ranking overview
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            frequency_weight: default_half(),
            rank_sum_weight: default_half(),
            scale: default_scale(),
            top_n: default_top_n(),
        }
    }
}

/// Cluster cohort selection
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CohortConfig {
    /// Highest source-table rank admitted to the cohort
    #[serde(default = "default_max_rank")]
    pub max_rank: u32,

    /// Artists admitted regardless of rank
    #[serde(default = "default_always_include")]
    pub always_include: Vec<String>,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            max_rank: default_max_rank(),
            always_include: default_always_include(),
        }
    }
}

/// Nearest-neighbor lookup parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimilarityConfig {
    #[serde(default = "default_headliner")]
    pub reference: String,

    #[serde(default = "default_k")]
    pub k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            reference: default_headliner(),
            k: default_k(),
        }
    }
}

/// Headliner/opener comparison parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SelectionConfig {
    #[serde(default = "default_headliner")]
    pub headliner: String,

    #[serde(default = "default_opener")]
    pub opener: String,

    /// Number of alternative artists listed next to the pair
    #[serde(default = "default_k")]
    pub alternatives: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            headliner: default_headliner(),
            opener: default_opener(),
            alternatives: default_k(),
        }
    }
}

/// Weights of the six decision matrix criteria
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecisionWeights {
    pub ranking_score: f64,
    pub genre_match: f64,
    pub target_demo_match: f64,
    pub tour_availability: f64,
    pub cost_effectiveness: f64,
    pub social_engagement: f64,
}

impl Default for DecisionWeights {
    fn default() -> Self {
        Self {
            ranking_score: 0.3,
            genre_match: 0.2,
            target_demo_match: 0.2,
            tour_availability: 0.1,
            cost_effectiveness: 0.1,
            social_engagement: 0.1,
        }
    }
}

impl DecisionWeights {
    /// Weights in criterion order, paired with their TOML key
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("ranking_score", self.ranking_score),
            ("genre_match", self.genre_match),
            ("target_demo_match", self.target_demo_match),
            ("tour_availability", self.tour_availability),
            ("cost_effectiveness", self.cost_effectiveness),
            ("social_engagement", self.social_engagement),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_half() -> f64 {
    0.5
}

fn default_scale() -> f64 {
    100.0
}

fn default_top_n() -> usize {
    20
}

fn default_max_rank() -> u32 {
    30
}

fn default_always_include() -> Vec<String> {
    vec![default_opener()]
}

fn default_headliner() -> String {
    "Sabrina Carpenter".to_string()
}

fn default_opener() -> String {
    "Gracie Abrams".to_string()
}

fn default_k() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve and load configuration, falling back to compiled defaults
    ///
    /// A missing file is only an error when it was named explicitly on the
    /// command line. A file that exists but does not parse is always an error.
    pub fn resolve_and_load(resolver: &ConfigResolver) -> Result<Self> {
        match resolver.resolve()? {
            Some(path) => Self::load(&path),
            None => {
                info!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject weights and sizes the engine cannot honor
    ///
    /// Ranking weights must be non-negative so the ranking score stays
    /// monotonically non-decreasing in both normalized components.
    pub fn validate(&self) -> Result<()> {
        let ranking = &self.ranking;
        for (name, weight) in [
            ("ranking.frequency_weight", ranking.frequency_weight),
            ("ranking.rank_sum_weight", ranking.rank_sum_weight),
        ] {
            check_weight(name, weight)?;
        }
        if !(ranking.scale.is_finite() && ranking.scale > 0.0) {
            return Err(Error::Config(format!(
                "ranking.scale must be positive, got {}",
                ranking.scale
            )));
        }
        if ranking.top_n == 0 {
            return Err(Error::Config("ranking.top_n must be at least 1".to_string()));
        }
        if self.cohort.max_rank == 0 && self.cohort.always_include.is_empty() {
            return Err(Error::Config(
                "cohort.max_rank is 0 and cohort.always_include is empty, cohort would be empty"
                    .to_string(),
            ));
        }
        if self.similarity.k == 0 {
            return Err(Error::Config("similarity.k must be at least 1".to_string()));
        }
        for (name, weight) in self.decision.named() {
            check_weight(&format!("decision.{}", name), weight)?;
        }
        Ok(())
    }
}

fn check_weight(name: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be a non-negative number, got {}",
            name, weight
        )))
    }
}

/// Config file resolver following the documented priority order
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve the config file path, if any
    ///
    /// Returns `Ok(None)` when no tier yields an existing file.
    pub fn resolve(&self) -> Result<Option<PathBuf>> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            if path.exists() {
                return Ok(Some(path.clone()));
            }
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        // Priority 2: Environment variable
        if let Ok(value) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(value);
            if path.exists() {
                return Ok(Some(path));
            }
            warn!(
                "{} points to missing file {}, ignoring",
                CONFIG_ENV_VAR,
                path.display()
            );
        }

        // Priority 3: Platform config directory
        if let Some(path) = default_config_path() {
            if path.exists() {
                return Ok(Some(path));
            }
        }

        // Priority 4: Compiled defaults
        Ok(None)
    }
}

/// Get the per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("headliner").join("config.toml"))
}
