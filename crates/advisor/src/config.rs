//! Advisor configuration management

use classvent_classifier::TreeConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::{AdvisorError, Result};

const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Advisor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Decision-tree configuration
    pub classifier: ClassifierConfig,
    /// Input validation configuration
    pub validation: ValidationConfig,
    /// Training data source
    pub dataset: DatasetConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

/// Decision-tree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum tree depth; unlimited when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Reuse trained models for an unchanged dataset
    pub cache_models: bool,
}

/// Input validation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject observations outside the supported ranges
    pub validate_inputs: bool,
}

/// Training data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file; the built-in table is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let tree = TreeConfig::default();
        Self {
            max_depth: tree.max_depth,
            min_samples_split: tree.min_samples_split,
            cache_models: false,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_inputs: true,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply `CLASSVENT_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CLASSVENT_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Some(val) = lookup("CLASSVENT_CLASSIFIER_MAX_DEPTH") {
            match val.trim() {
                "" | "none" => self.classifier.max_depth = None,
                depth => match depth.parse() {
                    Ok(depth) => self.classifier.max_depth = Some(depth),
                    Err(_) => warn!("Ignoring CLASSVENT_CLASSIFIER_MAX_DEPTH={:?}", val),
                },
            }
        }

        if let Some(val) = lookup("CLASSVENT_CLASSIFIER_CACHE") {
            self.classifier.cache_models = val.parse().unwrap_or(self.classifier.cache_models);
        }

        if let Some(val) = lookup("CLASSVENT_VALIDATE_INPUTS") {
            self.validation.validate_inputs = val.parse().unwrap_or(self.validation.validate_inputs);
        }

        if let Some(val) = lookup("CLASSVENT_DATASET_PATH") {
            self.dataset.path = Some(PathBuf::from(val));
        }
    }

    /// Tree parameters for the trainer
    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.classifier.max_depth,
            min_samples_split: self.classifier.min_samples_split,
        }
    }

    /// Validate configuration, returning human-readable warnings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.classifier.min_samples_split < 2 {
            warnings.push(format!(
                "min_samples_split is {}, nodes need at least 2 samples to split",
                self.classifier.min_samples_split
            ));
        }

        if self.classifier.max_depth == Some(0) {
            warnings.push("max_depth is 0, every tree is a single leaf".to_string());
        }

        if !KNOWN_LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            warnings.push(format!("Unknown log level {:?}", self.logging.level));
        }

        if warnings.is_empty() {
            info!("Configuration validation passed");
        } else {
            warn!("Configuration validation warnings: {:?}", warnings);
        }

        warnings
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml_string()?)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}
