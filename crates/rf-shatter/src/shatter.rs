//! Shatter: single-pass symbol upgrade on abundant symbols
//!
//! When any non-scatter symbol covers at least `threshold` cells, every cell
//! holding it is replaced by its one-step upgrade. All qualifying symbols are
//! judged against the counts of the incoming grid, so upgrades never cascade
//! within one application.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::symbols::SymbolId;

/// Occurrences of one symbol that trigger a shatter
pub const DEFAULT_SHATTER_THRESHOLD: usize = 8;

/// One symbol that reached the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShatterUpgrade {
    pub from: SymbolId,
    /// `None` for a terminal symbol (cells left as they are)
    pub to: Option<SymbolId>,
    pub count: usize,
}

/// Result of applying shatter to a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShatterOutcome {
    /// Post-shatter grid (equal to the input when nothing was upgraded)
    pub grid: Grid,
    pub triggered: bool,
    pub upgrades: Vec<ShatterUpgrade>,
}

impl ShatterOutcome {
    /// Cells whose symbol changed
    pub fn changed_cells(&self, before: &Grid) -> Vec<usize> {
        before
            .cells()
            .iter()
            .zip(self.grid.cells().iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Shatter rule with a configurable threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShatterRule {
    pub threshold: usize,
}

impl ShatterRule {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Symbols at or above the threshold, in symbol order
    pub fn qualifying(&self, grid: &Grid) -> Vec<ShatterUpgrade> {
        let counts = grid.counts();
        SymbolId::ALL
            .iter()
            .filter(|id| !id.is_scatter())
            .filter(|id| counts[id.index()] >= self.threshold)
            .map(|&id| ShatterUpgrade {
                from: id,
                to: id.upgrade(),
                count: counts[id.index()],
            })
            .collect()
    }

    /// Apply the transform. The input grid is left untouched.
    pub fn apply(&self, grid: &Grid) -> ShatterOutcome {
        let upgrades = self.qualifying(grid);
        if upgrades.is_empty() {
            return ShatterOutcome {
                grid: *grid,
                triggered: false,
                upgrades,
            };
        }

        // Mapping built from pre-shatter counts only
        let mut mapping: [Option<SymbolId>; SymbolId::COUNT] = [None; SymbolId::COUNT];
        for upgrade in &upgrades {
            mapping[upgrade.from.index()] = upgrade.to;
        }

        let shattered = grid.map(|symbol| mapping[symbol.index()].unwrap_or(symbol));

        ShatterOutcome {
            grid: shattered,
            triggered: true,
            upgrades,
        }
    }
}

impl Default for ShatterRule {
    fn default() -> Self {
        Self::new(DEFAULT_SHATTER_THRESHOLD)
    }
}

/// Apply shatter with the default threshold
pub fn apply_shatter(grid: &Grid) -> (Grid, bool) {
    let outcome = ShatterRule::default().apply(grid);
    (outcome.grid, outcome.triggered)
}
