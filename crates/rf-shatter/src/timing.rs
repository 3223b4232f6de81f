//! Autospin speed profiles and display timing

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SlotError;

/// Autospin speed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinSpeed {
    /// Base cadence
    #[default]
    Normal,
    /// 3× faster
    Turbo,
    /// 5× faster
    SuperTurbo,
}

impl SpinSpeed {
    /// Divisor applied to the base interval
    pub fn multiplier(&self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Turbo => 3,
            Self::SuperTurbo => 5,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Turbo => "Turbo",
            Self::SuperTurbo => "Super Turbo",
        }
    }
}

impl fmt::Display for SpinSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SpinSpeed {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "normal" | "1" | "x1" => Ok(Self::Normal),
            "turbo" | "3" | "x3" => Ok(Self::Turbo),
            "super_turbo" | "superturbo" | "5" | "x5" => Ok(Self::SuperTurbo),
            other => Err(SlotError::InvalidConfig(format!("unknown spin speed '{other}'"))),
        }
    }
}

/// Timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Autospin interval at normal speed (ms)
    pub base_interval_ms: u64,

    /// How long the renderer shows the shatter effect before calling
    /// `clear_shatter_display` (ms)
    pub shatter_display_ms: u64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            base_interval_ms: 1000,
            shatter_display_ms: 1500,
        }
    }

    /// Near-instant timing for tests and batch runs
    pub fn instant() -> Self {
        Self {
            base_interval_ms: 1,
            shatter_display_ms: 0,
        }
    }

    /// Autospin tick interval for a speed setting
    pub fn autospin_interval(&self, speed: SpinSpeed) -> Duration {
        Duration::from_millis(self.base_interval_ms / speed.multiplier() as u64)
    }

    pub fn shatter_display(&self) -> Duration {
        Duration::from_millis(self.shatter_display_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_multipliers() {
        assert_eq!(SpinSpeed::Normal.multiplier(), 1);
        assert_eq!(SpinSpeed::Turbo.multiplier(), 3);
        assert_eq!(SpinSpeed::SuperTurbo.multiplier(), 5);
    }

    #[test]
    fn test_autospin_interval() {
        let timing = TimingConfig::normal();
        assert_eq!(timing.autospin_interval(SpinSpeed::Normal), Duration::from_millis(1000));
        assert_eq!(timing.autospin_interval(SpinSpeed::Turbo), Duration::from_millis(333));
        assert_eq!(timing.autospin_interval(SpinSpeed::SuperTurbo), Duration::from_millis(200));
        assert_eq!(timing.shatter_display(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!("turbo".parse::<SpinSpeed>().unwrap(), SpinSpeed::Turbo);
        assert_eq!("Super-Turbo".parse::<SpinSpeed>().unwrap(), SpinSpeed::SuperTurbo);
        assert_eq!("x1".parse::<SpinSpeed>().unwrap(), SpinSpeed::Normal);
        assert!("warp".parse::<SpinSpeed>().is_err());
    }
}
