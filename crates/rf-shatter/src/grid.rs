//! 5×5 symbol grid and weighted grid generation

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::{SymbolCatalog, SymbolId};

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 5;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;

/// Row-major 5×5 grid of symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: [[SymbolId; GRID_COLS]; GRID_ROWS],
}

impl Grid {
    pub fn from_rows(rows: [[SymbolId; GRID_COLS]; GRID_ROWS]) -> Self {
        Self { rows }
    }

    /// Build from 25 cells in row-major order
    pub fn from_cells(cells: [SymbolId; GRID_CELLS]) -> Self {
        Self {
            rows: std::array::from_fn(|r| std::array::from_fn(|c| cells[r * GRID_COLS + c])),
        }
    }

    /// Grid filled with one symbol
    pub fn filled(symbol: SymbolId) -> Self {
        Self {
            rows: [[symbol; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Parse whitespace separated symbols (names or glyphs), row-major
    pub fn parse(text: &str) -> SlotResult<Self> {
        let symbols = text
            .split_whitespace()
            .map(str::parse::<SymbolId>)
            .collect::<SlotResult<Vec<_>>>()?;
        let cells: [SymbolId; GRID_CELLS] = symbols.try_into().map_err(|v: Vec<SymbolId>| {
            SlotError::InvalidConfig(format!("grid needs {} cells, got {}", GRID_CELLS, v.len()))
        })?;
        Ok(Self::from_cells(cells))
    }

    pub fn rows(&self) -> &[[SymbolId; GRID_COLS]; GRID_ROWS] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> SymbolId {
        self.rows[row][col]
    }

    /// Cell by flat row-major index
    pub fn cell(&self, index: usize) -> SymbolId {
        self.rows[index / GRID_COLS][index % GRID_COLS]
    }

    /// All 25 cells in row-major order
    pub fn cells(&self) -> [SymbolId; GRID_CELLS] {
        std::array::from_fn(|i| self.cell(i))
    }

    /// Occurrences of `symbol` anywhere on the grid
    pub fn count(&self, symbol: SymbolId) -> usize {
        self.rows.iter().flatten().filter(|&&s| s == symbol).count()
    }

    /// Occurrences of every symbol, indexed by `SymbolId::index`
    pub fn counts(&self) -> [usize; SymbolId::COUNT] {
        let mut counts = [0usize; SymbolId::COUNT];
        for symbol in self.rows.iter().flatten() {
            counts[symbol.index()] += 1;
        }
        counts
    }

    /// Copy of this grid with `f` applied to every cell
    pub fn map(&self, mut f: impl FnMut(SymbolId) -> SymbolId) -> Self {
        Self {
            rows: self.rows.map(|row| row.map(&mut f)),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let line: Vec<&str> = row.iter().map(|s| s.glyph()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Draw one symbol by inverse-transform sampling over the catalog order
pub fn sample_symbol<R: Rng>(catalog: &SymbolCatalog, rng: &mut R) -> SymbolId {
    let total = catalog.total_weight();
    // Clamp strictly below the total so accumulated rounding can never overshoot
    let mut r = rng.random::<f64>() * total;
    if r >= total {
        r = largest_below(total);
    }

    let symbols = catalog.symbols();
    for def in symbols {
        r -= def.weight;
        if r < 0.0 {
            return def.id;
        }
    }

    // Rounding fallback: last symbol in catalog order
    symbols[symbols.len() - 1].id
}

/// Fill 25 independent cells
pub fn generate_grid<R: Rng>(catalog: &SymbolCatalog, rng: &mut R) -> Grid {
    let mut rows = [[SymbolId::SCATTER; GRID_COLS]; GRID_ROWS];
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            *cell = sample_symbol(catalog, rng);
        }
    }
    Grid::from_rows(rows)
}

/// Largest float strictly below a positive finite `value`
fn largest_below(value: f64) -> f64 {
    if value <= 0.0 {
        0.0
    } else {
        f64::from_bits(value.to_bits() - 1)
    }
}
