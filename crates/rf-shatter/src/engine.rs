//! Shatter slot engine: spin state machine and session ledger

use std::sync::Arc;

use parking_lot::Mutex;
use rand::prelude::*;

use crate::config::SlotConfig;
use crate::error::{SlotError, SlotResult};
use crate::grid::{Grid, generate_grid};
use crate::paytable::PayTable;
use crate::session::{Session, SessionStats};
use crate::shatter::ShatterRule;
use crate::spin::{SpinKind, SpinOutcome, SpinReport};

/// Engine handle shared between the caller and the autospin worker
pub type SharedEngine = Arc<Mutex<SlotEngine>>;

/// Shatter slot engine
///
/// Owns the session ledger and resolves one spin at a time. Base spins debit
/// the bet; free spins are granted by scatters and cost nothing. Either kind
/// may shatter, crediting the post-shatter grid's win on top of the drawn
/// grid's win.
pub struct SlotEngine {
    /// Configuration
    config: SlotConfig,
    /// Catalog plus paylines
    paytable: PayTable,
    /// Upgrade threshold
    shatter_rule: ShatterRule,
    /// Random number generator
    rng: StdRng,
    /// Bankroll and bonus state
    session: Session,
    /// Running statistics
    stats: SessionStats,
    /// Spins resolved this session
    spin_count: u64,
}

impl SlotEngine {
    /// Create a new engine with default config
    pub fn new() -> Self {
        let config = SlotConfig::default();
        Self::build(PayTable::standard(), config)
    }

    /// Create with specific config
    pub fn with_config(config: SlotConfig) -> SlotResult<Self> {
        config.validate()?;
        let paytable = PayTable::new(config.catalog()?);
        Ok(Self::build(paytable, config))
    }

    fn build(paytable: PayTable, config: SlotConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            shatter_rule: config.shatter_rule(),
            session: Session::new(config.initial_balance, config.default_bet),
            paytable,
            rng,
            config,
            stats: SessionStats::default(),
            spin_count: 0,
        }
    }

    /// Wrap in a shared handle for the autospin scheduler
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get current config
    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Seed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Set the bet for subsequent base spins.
    ///
    /// Rejected when not a positive number or larger than the balance; the
    /// session is left unchanged on error.
    pub fn set_bet_size(&mut self, value: f64) -> SlotResult<()> {
        if !value.is_finite() || value <= 0.0 || value > self.session.balance {
            log::warn!("Rejected bet {} (balance {:.2})", value, self.session.balance);
            return Err(SlotError::InvalidBet {
                value,
                balance: self.session.balance,
            });
        }
        self.session.bet_size = value;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SESSION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Snapshot of the session ledger
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    /// Get session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn in_free_spins(&self) -> bool {
        self.session.is_free_spin_mode
    }

    pub fn free_spins_remaining(&self) -> u32 {
        self.session.free_spins_left
    }

    /// Called by the renderer once the shatter effect has been shown
    pub fn clear_shatter_display(&mut self) {
        self.session.is_shattering = false;
    }

    /// Start a fresh session with `initial_balance`.
    ///
    /// The bet goes back to the configured default, capped at the new
    /// balance. A balance that is not a positive number is rejected and the
    /// session is left unchanged.
    pub fn reset_session(&mut self, initial_balance: f64) -> SlotResult<()> {
        if !initial_balance.is_finite() || initial_balance <= 0.0 {
            return Err(SlotError::InvalidConfig(format!(
                "initial balance must be positive, got {}",
                initial_balance
            )));
        }
        let bet = self.config.default_bet.min(initial_balance);
        log::info!("Session reset (balance {:.2}, bet {})", initial_balance, bet);
        self.session = Session::new(initial_balance, bet);
        self.stats = SessionStats::default();
        self.spin_count = 0;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw a grid and resolve it as the next spin (base or free)
    pub fn spin(&mut self) -> SpinReport {
        let grid = generate_grid(self.paytable.catalog(), &mut self.rng);
        self.resolve(grid)
    }

    /// Resolve a caller-supplied grid as the next spin
    pub fn spin_forced(&mut self, grid: Grid) -> SpinReport {
        self.resolve(grid)
    }

    fn resolve(&mut self, drawn: Grid) -> SpinReport {
        let kind = if self.session.is_free_spin_mode {
            SpinKind::Free
        } else {
            SpinKind::Base
        };
        let bet = match kind {
            SpinKind::Base => self.session.bet_size,
            SpinKind::Free => 0.0,
        };

        // Drawn grid
        let evaluation = self.paytable.evaluate(&drawn);
        let line_win = evaluation.line_win;
        self.credit(kind, bet, line_win);

        // Shatter: at most once, never consumes bet or free spins
        let shatter = self.shatter_rule.apply(&drawn);
        let (shatter_win, shatter_line_wins) = if shatter.triggered {
            let post = self.paytable.evaluate(&shatter.grid);
            self.credit(kind, 0.0, post.line_win);
            (post.line_win, post.line_wins)
        } else {
            (0.0, Vec::new())
        };
        self.session.is_shattering = shatter.triggered;

        let total_win = line_win + shatter_win;
        let scatter_count = evaluation.scatter_count;
        let outcome = match kind {
            SpinKind::Base => self.advance_base(scatter_count),
            SpinKind::Free => self.advance_free(scatter_count),
        };

        self.spin_count += 1;
        self.update_stats(kind, bet, total_win, shatter.triggered, outcome);

        let message = outcome.message(scatter_count, total_win);
        log::debug!(
            "Spin #{} {:?}: win {:.2} (shatter {:.2}), {} scatters, balance {:.2}",
            self.spin_count,
            kind,
            total_win,
            shatter_win,
            scatter_count,
            self.session.balance
        );

        SpinReport {
            spin_index: self.spin_count,
            kind,
            outcome,
            message,
            bet,
            pre_shatter_grid: drawn,
            grid: shatter.grid,
            line_win,
            shatter_win,
            total_win,
            scatter_count,
            shattered: shatter.triggered,
            upgrades: shatter.upgrades,
            line_wins: evaluation.line_wins,
            shatter_line_wins,
            balance: self.session.balance,
        }
    }

    fn credit(&mut self, kind: SpinKind, bet: f64, win: f64) {
        let session = &mut self.session;
        session.balance += win - bet;
        session.total_bet += bet;
        session.total_win += win;
        if kind == SpinKind::Free {
            session.free_spin_wins += win;
        }
    }

    /// Enter free-spin mode after win accounting
    fn advance_base(&mut self, scatter_count: usize) -> SpinOutcome {
        if scatter_count < self.config.scatter_trigger_count {
            return SpinOutcome::Base;
        }

        let awarded = self.config.free_spins_award;
        self.session.is_free_spin_mode = true;
        self.session.free_spins_left = awarded;
        self.session.free_spin_wins = 0.0;
        log::info!("Free spins triggered: {} scatters, {} spins", scatter_count, awarded);
        SpinOutcome::FreeSpinsTriggered { awarded }
    }

    /// Decrement, retrigger, then check for exhaustion
    fn advance_free(&mut self, scatter_count: usize) -> SpinOutcome {
        let session = &mut self.session;
        session.free_spins_left = session.free_spins_left.saturating_sub(1);

        let retriggered = scatter_count >= self.config.scatter_trigger_count;
        let awarded = self.config.free_spins_award;
        if retriggered {
            session.free_spins_left += awarded;
            log::info!(
                "Free spins retriggered: +{} ({} left)",
                awarded,
                session.free_spins_left
            );
        }

        if session.free_spins_left == 0 {
            session.is_free_spin_mode = false;
            log::info!(
                "Free spins complete: total win {:.2}",
                session.free_spin_wins
            );
            SpinOutcome::FreeSpinsComplete {
                total_win: session.free_spin_wins,
            }
        } else if retriggered {
            SpinOutcome::Retrigger {
                awarded,
                remaining: session.free_spins_left,
            }
        } else {
            SpinOutcome::FreeSpin {
                remaining: session.free_spins_left,
            }
        }
    }

    fn update_stats(
        &mut self,
        kind: SpinKind,
        bet: f64,
        total_win: f64,
        shattered: bool,
        outcome: SpinOutcome,
    ) {
        let stats = &mut self.stats;
        stats.total_spins += 1;
        match kind {
            SpinKind::Base => stats.base_spins += 1,
            SpinKind::Free => stats.free_spins += 1,
        }
        stats.total_bet += bet;
        stats.total_win += total_win;

        if total_win > 0.0 {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }
        if shattered {
            stats.shatters += 1;
        }
        match outcome {
            SpinOutcome::FreeSpinsTriggered { .. } => stats.free_spin_triggers += 1,
            SpinOutcome::Retrigger { .. } => stats.retriggers += 1,
            _ => {}
        }
        if total_win > stats.max_win {
            stats.max_win = total_win;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export config as JSON
    pub fn export_config(&self) -> SlotResult<String> {
        self.config.to_json()
    }

    /// Import config from JSON.
    ///
    /// Replaces the catalog, rules and timing; the running session is kept.
    pub fn import_config(&mut self, json: &str) -> SlotResult<()> {
        let config = SlotConfig::from_json(json)?;
        self.paytable = PayTable::new(config.catalog()?);
        self.shatter_rule = config.shatter_rule();
        if let Some(seed) = config.seed {
            self.seed(seed);
        }
        self.config = config;
        Ok(())
    }
}

impl Default for SlotEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolId::{self, *};

    fn seeded() -> SlotEngine {
        SlotEngine::with_config(SlotConfig {
            seed: Some(12345),
            ..SlotConfig::default()
        })
        .unwrap()
    }

    /// Nothing pays, no scatters, no symbol above 7 cells
    fn quiet_grid() -> Grid {
        const PATTERN: [SymbolId; 6] = [Zombie, Blood, Book, Ghost, Candle, Skull];
        Grid::from_cells(std::array::from_fn(|i| PATTERN[(i / 5 + 2 * (i % 5)) % 6]))
    }

    fn with_scatters(cells: &[usize]) -> Grid {
        let mut all = quiet_grid().cells();
        for &c in cells {
            all[c] = FreeSpin;
        }
        Grid::from_cells(all)
    }

    #[test]
    fn test_engine_creation() {
        let engine = SlotEngine::new();
        let session = engine.session();
        assert_eq!(session.balance, 1000.0);
        assert_eq!(session.bet_size, 1.0);
        assert_eq!(engine.stats().total_spins, 0);
    }

    #[test]
    fn test_losing_base_spin_debits_bet() {
        let mut engine = seeded();
        let report = engine.spin_forced(quiet_grid());
        assert_eq!(report.kind, SpinKind::Base);
        assert_eq!(report.total_win, 0.0);
        assert!(!report.shattered);
        assert_eq!(report.message, "0 FS Symbols - Win: 0.00");

        let session = engine.session();
        assert_eq!(session.balance, 999.0);
        assert_eq!(session.total_bet, 1.0);
        assert_eq!(session.total_win, 0.0);
    }

    #[test]
    fn test_seeded_spins_are_reproducible() {
        let mut a = seeded();
        let mut b = seeded();
        for _ in 0..20 {
            assert_eq!(a.spin(), b.spin());
        }
        assert_eq!(a.session(), b.session());
    }

    #[test]
    fn test_free_spins_entry() {
        let mut engine = seeded();
        let report = engine.spin_forced(with_scatters(&[1, 13, 22]));
        assert_eq!(report.outcome, SpinOutcome::FreeSpinsTriggered { awarded: 10 });
        assert_eq!(report.message, "Entering Free Spins (10)");

        let session = engine.session();
        assert!(session.is_free_spin_mode);
        assert_eq!(session.free_spins_left, 10);
        assert_eq!(session.free_spin_wins, 0.0);
        assert!(engine.in_free_spins());
    }

    #[test]
    fn test_free_spin_costs_nothing() {
        let mut engine = seeded();
        engine.spin_forced(with_scatters(&[1, 13, 22]));
        let before = engine.session();

        let report = engine.spin_forced(quiet_grid());
        assert_eq!(report.kind, SpinKind::Free);
        assert_eq!(report.bet, 0.0);
        assert_eq!(report.outcome, SpinOutcome::FreeSpin { remaining: 9 });
        assert_eq!(report.message, "9 Free Spins Left - Win: 0.00");

        let after = engine.session();
        assert_eq!(after.balance, before.balance);
        assert_eq!(after.total_bet, before.total_bet);
    }

    #[test]
    fn test_set_bet_size_validation() {
        let mut engine = seeded();
        assert!(engine.set_bet_size(5.0).is_ok());
        assert_eq!(engine.session().bet_size, 5.0);

        assert!(matches!(
            engine.set_bet_size(0.0),
            Err(SlotError::InvalidBet { .. })
        ));
        assert!(engine.set_bet_size(1001.0).is_err());
        assert!(engine.set_bet_size(f64::NAN).is_err());
        assert_eq!(engine.session().bet_size, 5.0);
    }

    #[test]
    fn test_clear_shatter_display() {
        let mut engine = seeded();
        let mut cells = quiet_grid().cells();
        cells[..8].fill(Zombie);
        let report = engine.spin_forced(Grid::from_cells(cells));
        assert!(report.shattered);
        assert!(engine.session().is_shattering);

        engine.clear_shatter_display();
        assert!(!engine.session().is_shattering);
    }

    #[test]
    fn test_reset_session() {
        let mut engine = seeded();
        for _ in 0..5 {
            engine.spin();
        }
        engine.reset_session(500.0).unwrap();
        let session = engine.session();
        assert_eq!(session.balance, 500.0);
        assert_eq!(session.bet_size, engine.config().default_bet);
        assert_eq!(session.total_bet, 0.0);
        assert_eq!(engine.stats().total_spins, 0);
        assert_eq!(engine.spin_count(), 0);
    }

    #[test]
    fn test_reset_session_caps_bet_at_balance() {
        let mut engine = seeded();
        engine.reset_session(0.5).unwrap();
        let session = engine.session();
        assert_eq!(session.balance, 0.5);
        assert_eq!(session.bet_size, 0.5);
    }

    #[test]
    fn test_reset_session_rejects_bad_balance() {
        let mut engine = seeded();
        engine.spin();
        let before = engine.session();

        for balance in [f64::NAN, f64::INFINITY, -10.0, 0.0] {
            assert!(matches!(
                engine.reset_session(balance),
                Err(SlotError::InvalidConfig(_))
            ));
        }
        assert_eq!(engine.session(), before);
        assert_eq!(engine.spin_count(), 1);
    }

    #[test]
    fn test_export_import_config() {
        let mut engine = seeded();
        let mut config = engine.config().clone();
        config.shatter_threshold = 5;
        config.free_spins_award = 15;
        engine.import_config(&config.to_json().unwrap()).unwrap();
        assert_eq!(engine.config().free_spins_award, 15);

        let exported = engine.export_config().unwrap();
        assert_eq!(SlotConfig::from_json(&exported).unwrap(), config);

        assert!(engine.import_config("{ not json").is_err());
        assert_eq!(engine.config().free_spins_award, 15);
    }

    #[test]
    fn test_stats_follow_spins() {
        let mut engine = seeded();
        for _ in 0..200 {
            engine.spin();
        }
        let stats = engine.stats();
        assert_eq!(stats.total_spins, 200);
        assert_eq!(stats.base_spins + stats.free_spins, 200);
        assert_eq!(stats.wins + stats.losses, 200);
        let session = engine.session();
        assert!((stats.total_win - session.total_win).abs() < 1e-9);
        assert!((stats.total_bet - session.total_bet).abs() < 1e-9);
    }
}
