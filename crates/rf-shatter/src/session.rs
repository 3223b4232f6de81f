//! Session ledger and running statistics

use serde::{Deserialize, Serialize};

/// Bankroll and bonus state for one player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub balance: f64,
    pub bet_size: f64,
    /// Sum of all bets placed (free spins place none)
    pub total_bet: f64,
    /// Sum of all wins credited, shatter wins included
    pub total_win: f64,
    pub is_free_spin_mode: bool,
    pub free_spins_left: u32,
    /// Wins accumulated during the current (or last) free-spin round
    pub free_spin_wins: f64,
    /// Set by a spin that shattered; cleared by the renderer
    pub is_shattering: bool,
}

impl Session {
    pub fn new(initial_balance: f64, bet_size: f64) -> Self {
        Self {
            balance: initial_balance,
            bet_size,
            total_bet: 0.0,
            total_win: 0.0,
            is_free_spin_mode: false,
            free_spins_left: 0,
            free_spin_wins: 0.0,
            is_shattering: false,
        }
    }

    /// One-line bankroll summary for status displays
    pub fn ledger_line(&self) -> String {
        format!(
            "Balance: ${:.2} | Total Bet: ${:.2} | Total Win: ${:.2}",
            self.balance, self.total_bet, self.total_win
        )
    }

    /// Net result so far (wins minus bets)
    pub fn net(&self) -> f64 {
        self.total_win - self.total_bet
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1000.0, 1.0)
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub base_spins: u64,
    pub free_spins: u64,
    pub total_bet: f64,
    pub total_win: f64,
    /// Spins with a non-zero total win
    pub wins: u64,
    pub losses: u64,
    pub shatters: u64,
    pub free_spin_triggers: u64,
    pub retriggers: u64,
    /// Largest single-spin total win
    pub max_win: f64,
}

impl SessionStats {
    /// Return to player in percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0.0 {
            (self.total_win / self.total_bet) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins in percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Shatter frequency in percent
    pub fn shatter_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.shatters as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new(1000.0, 1.0);
        assert_eq!(session.balance, 1000.0);
        assert_eq!(session.bet_size, 1.0);
        assert!(!session.is_free_spin_mode);
        assert_eq!(session.free_spins_left, 0);
        assert!(!session.is_shattering);
    }

    #[test]
    fn test_ledger_line() {
        let mut session = Session::new(1000.0, 1.0);
        session.balance = 1001.5;
        session.total_bet = 3.0;
        session.total_win = 4.5;
        assert_eq!(
            session.ledger_line(),
            "Balance: $1001.50 | Total Bet: $3.00 | Total Win: $4.50"
        );
        assert_eq!(session.net(), 1.5);
    }

    #[test]
    fn test_stats_ratios() {
        let stats = SessionStats {
            total_spins: 4,
            wins: 1,
            shatters: 2,
            total_bet: 4.0,
            total_win: 3.0,
            ..Default::default()
        };
        assert_eq!(stats.rtp(), 75.0);
        assert_eq!(stats.hit_rate(), 25.0);
        assert_eq!(stats.shatter_rate(), 50.0);
        assert_eq!(SessionStats::default().rtp(), 0.0);
    }
}
