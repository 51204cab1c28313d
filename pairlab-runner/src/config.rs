//! Serializable run configuration.
//!
//! Everything a run needs beyond the data itself: rolling window, the two
//! threshold schemes, significance levels, selection mode, and the ranking
//! strategy. Defaults mirror the production constants (window 20, entry
//! ±2.0, exit 0.5, advisory ±1.2 over the last 5, significance 0.05 global
//! / 0.10 subset).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairlab_core::{AdvisoryConfig, RankBy, SelectionMode, SignalConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Selection mode as written in config files and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeConfig {
    #[default]
    Global,
    Anchor {
        anchor: String,
    },
    Subset {
        symbols: Vec<String>,
        anchor: String,
    },
}

impl ModeConfig {
    pub fn to_selection_mode(&self) -> SelectionMode {
        match self {
            ModeConfig::Global => SelectionMode::Global,
            ModeConfig::Anchor { anchor } => SelectionMode::Anchor {
                anchor: anchor.clone(),
            },
            ModeConfig::Subset { symbols, anchor } => SelectionMode::Subset {
                symbols: symbols.clone(),
                anchor: anchor.clone(),
            },
        }
    }
}

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Rolling window for z-score and correlation, in trading days.
    pub window: usize,
    /// |z| that opens a position from flat.
    pub entry_z: f64,
    /// |z| below which an open position closes.
    pub exit_z: f64,
    /// Advisory |mean z| threshold.
    pub advisory_threshold: f64,
    /// Advisory trailing-mean lookback.
    pub advisory_lookback: usize,
    /// Ranking strategy among candidates.
    pub rank_by: RankBy,
    /// Selection mode. Kept last so TOML serialization emits the table
    /// after the scalar fields.
    pub mode: ModeConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let signal = SignalConfig::default();
        let advisory = AdvisoryConfig::default();
        Self {
            window: pairlab_core::DEFAULT_WINDOW,
            entry_z: signal.entry_z,
            exit_z: signal.exit_z,
            advisory_threshold: advisory.threshold,
            advisory_lookback: advisory.lookback,
            mode: ModeConfig::Global,
            rank_by: RankBy::PValue,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::Invalid("window must be >= 1".into()));
        }
        if !(self.entry_z > 0.0 && self.entry_z.is_finite()) {
            return Err(ConfigError::Invalid("entry_z must be positive".into()));
        }
        if !(self.exit_z > 0.0 && self.exit_z.is_finite()) {
            return Err(ConfigError::Invalid("exit_z must be positive".into()));
        }
        if self.exit_z >= self.entry_z {
            return Err(ConfigError::Invalid(
                "exit_z must be below entry_z (the bands would overlap)".into(),
            ));
        }
        if self.advisory_lookback == 0 {
            return Err(ConfigError::Invalid(
                "advisory_lookback must be >= 1".into(),
            ));
        }
        Ok(())
    }

    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig {
            entry_z: self.entry_z,
            exit_z: self.exit_z,
        }
    }

    pub fn advisory_config(&self) -> AdvisoryConfig {
        AdvisoryConfig {
            threshold: self.advisory_threshold,
            lookback: self.advisory_lookback,
        }
    }
}
