//! Slot engine configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::shatter::{DEFAULT_SHATTER_THRESHOLD, ShatterRule};
use crate::symbols::{SymbolCatalog, SymbolDef};
use crate::timing::TimingConfig;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Starting bankroll for a new session
    pub initial_balance: f64,
    /// Bet size a new session starts with
    pub default_bet: f64,
    /// Free spins granted per trigger (and per retrigger)
    pub free_spins_award: u32,
    /// Scatters needed to trigger free spins
    pub scatter_trigger_count: usize,
    /// Occurrences of one symbol that trigger a shatter
    pub shatter_threshold: usize,
    /// Fixed RNG seed (None = seeded from the OS)
    pub seed: Option<u64>,
    /// Weight/payout override; must list every symbol exactly once
    pub symbols: Option<Vec<SymbolDef>>,
    pub timing: TimingConfig,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
            default_bet: 1.0,
            free_spins_award: 10,
            scatter_trigger_count: 3,
            shatter_threshold: DEFAULT_SHATTER_THRESHOLD,
            seed: None,
            symbols: None,
            timing: TimingConfig::default(),
        }
    }
}

impl SlotConfig {
    /// Check value ranges and the symbol override
    pub fn validate(&self) -> SlotResult<()> {
        if !self.initial_balance.is_finite() || self.initial_balance <= 0.0 {
            return Err(SlotError::InvalidConfig(format!(
                "initial_balance must be positive, got {}",
                self.initial_balance
            )));
        }
        if !self.default_bet.is_finite() || self.default_bet <= 0.0 {
            return Err(SlotError::InvalidConfig(format!(
                "default_bet must be positive, got {}",
                self.default_bet
            )));
        }
        if self.default_bet > self.initial_balance {
            return Err(SlotError::InvalidConfig(format!(
                "default_bet {} exceeds initial_balance {}",
                self.default_bet, self.initial_balance
            )));
        }
        if self.free_spins_award == 0 {
            return Err(SlotError::InvalidConfig(
                "free_spins_award must be at least 1".into(),
            ));
        }
        if self.scatter_trigger_count == 0 {
            return Err(SlotError::InvalidConfig(
                "scatter_trigger_count must be at least 1".into(),
            ));
        }
        if self.shatter_threshold == 0 {
            return Err(SlotError::InvalidConfig(
                "shatter_threshold must be at least 1".into(),
            ));
        }
        if self.timing.base_interval_ms == 0 {
            return Err(SlotError::InvalidConfig(
                "timing.base_interval_ms must be at least 1".into(),
            ));
        }
        self.catalog().map(|_| ())
    }

    /// Symbol catalog described by this config
    pub fn catalog(&self) -> SlotResult<SymbolCatalog> {
        match &self.symbols {
            Some(defs) => SymbolCatalog::new(defs.clone()),
            None => Ok(SymbolCatalog::standard()),
        }
    }

    pub fn shatter_rule(&self) -> ShatterRule {
        ShatterRule::new(self.shatter_threshold)
    }

    pub fn to_json(&self) -> SlotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: Self = serde_yml::from_str(yaml).map_err(|e| SlotError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> SlotResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Err(SlotError::InvalidConfig(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }
}
