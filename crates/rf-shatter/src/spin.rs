//! Spin reports

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::paytable::LineWin;
use crate::shatter::ShatterUpgrade;

/// Whether a spin was paid for or granted by the bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinKind {
    Base,
    Free,
}

/// Where the free-spin state machine ended up after a spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpinOutcome {
    /// Base spin, no bonus
    Base,
    /// Base spin that entered free-spin mode
    FreeSpinsTriggered { awarded: u32 },
    /// Free spin, mode continues
    FreeSpin { remaining: u32 },
    /// Free spin that added more spins
    Retrigger { awarded: u32, remaining: u32 },
    /// Last free spin, mode left
    FreeSpinsComplete { total_win: f64 },
}

impl SpinOutcome {
    /// Status text shown after the spin
    pub fn message(&self, scatter_count: usize, win: f64) -> String {
        match self {
            Self::Base => format!("{} FS Symbols - Win: {:.2}", scatter_count, win),
            Self::FreeSpinsTriggered { awarded } => format!("Entering Free Spins ({})", awarded),
            Self::FreeSpin { remaining } | Self::Retrigger { remaining, .. } => {
                format!("{} Free Spins Left - Win: {:.2}", remaining, win)
            }
            Self::FreeSpinsComplete { total_win } => {
                format!("Free Spins Over. Total winnings: {:.2}", total_win)
            }
        }
    }

    pub fn is_bonus_entry(&self) -> bool {
        matches!(self, Self::FreeSpinsTriggered { .. })
    }

    pub fn is_bonus_exit(&self) -> bool {
        matches!(self, Self::FreeSpinsComplete { .. })
    }
}

/// Everything a renderer needs to present one resolved spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinReport {
    /// 1-based spin number within the session
    pub spin_index: u64,
    pub kind: SpinKind,
    pub outcome: SpinOutcome,
    pub message: String,
    /// Bet debited (0 for free spins)
    pub bet: f64,
    /// Grid as drawn
    pub pre_shatter_grid: Grid,
    /// Grid after shatter (equal to `pre_shatter_grid` when not shattered)
    pub grid: Grid,
    /// Win of the drawn grid
    pub line_win: f64,
    /// Incremental win of the post-shatter grid
    pub shatter_win: f64,
    /// `line_win + shatter_win`
    pub total_win: f64,
    pub scatter_count: usize,
    pub shattered: bool,
    pub upgrades: Vec<ShatterUpgrade>,
    pub line_wins: Vec<LineWin>,
    /// Line wins of the post-shatter grid
    pub shatter_line_wins: Vec<LineWin>,
    /// Balance after the spin
    pub balance: f64,
}

impl SpinReport {
    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    pub fn is_free_spin(&self) -> bool {
        self.kind == SpinKind::Free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(SpinOutcome::Base.message(2, 1.5), "2 FS Symbols - Win: 1.50");
        assert_eq!(
            SpinOutcome::FreeSpinsTriggered { awarded: 10 }.message(3, 0.0),
            "Entering Free Spins (10)"
        );
        assert_eq!(
            SpinOutcome::FreeSpin { remaining: 7 }.message(0, 0.2),
            "7 Free Spins Left - Win: 0.20"
        );
        assert_eq!(
            SpinOutcome::Retrigger {
                awarded: 10,
                remaining: 15
            }
            .message(3, 0.0),
            "15 Free Spins Left - Win: 0.00"
        );
        assert_eq!(
            SpinOutcome::FreeSpinsComplete { total_win: 12.5 }.message(0, 0.0),
            "Free Spins Over. Total winnings: 12.50"
        );
    }

    #[test]
    fn test_outcome_flags() {
        assert!(SpinOutcome::FreeSpinsTriggered { awarded: 10 }.is_bonus_entry());
        assert!(SpinOutcome::FreeSpinsComplete { total_win: 0.0 }.is_bonus_exit());
        assert!(!SpinOutcome::Base.is_bonus_entry());
    }
}
