//! Paylines and win evaluation

use serde::{Deserialize, Serialize};

use crate::grid::{GRID_COLS, Grid};
use crate::symbols::{SymbolCatalog, SymbolId};

/// Shortest run that pays
pub const MIN_PAYING_RUN: usize = 3;

/// A payline definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row-major cell indices, evaluated left to right
    pub cells: [usize; GRID_COLS],
}

impl Payline {
    pub const fn new(index: u8, cells: [usize; GRID_COLS]) -> Self {
        Self { index, cells }
    }
}

/// The ten fixed lines of the 5×5 grid
pub const PAYLINES: [Payline; 10] = [
    // Rows
    Payline::new(0, [0, 1, 2, 3, 4]),
    Payline::new(1, [5, 6, 7, 8, 9]),
    Payline::new(2, [10, 11, 12, 13, 14]),
    Payline::new(3, [15, 16, 17, 18, 19]),
    Payline::new(4, [20, 21, 22, 23, 24]),
    // Diagonals
    Payline::new(5, [0, 6, 12, 18, 24]),
    Payline::new(6, [4, 8, 12, 16, 20]),
    // Columns, read top to bottom
    Payline::new(7, [0, 5, 10, 15, 20]),
    Payline::new(8, [4, 9, 14, 19, 24]),
    Payline::new(9, [2, 7, 12, 17, 22]),
];

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    pub line_index: u8,
    pub symbol: SymbolId,
    /// Consecutive matches from the first cell
    pub match_count: usize,
    pub win_amount: f64,
    /// Winning cells (row-major indices)
    pub cells: Vec<usize>,
}

/// Result of one evaluation pass over a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub grid: Grid,
    /// Sum of all line wins
    pub line_win: f64,
    /// Scatters anywhere on the grid
    pub scatter_count: usize,
    pub line_wins: Vec<LineWin>,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.line_win > 0.0
    }
}

/// Catalog plus paylines
#[derive(Debug, Clone)]
pub struct PayTable {
    catalog: SymbolCatalog,
    paylines: Vec<Payline>,
}

impl PayTable {
    /// Standard catalog on the ten fixed lines
    pub fn standard() -> Self {
        Self::new(SymbolCatalog::standard())
    }

    pub fn new(catalog: SymbolCatalog) -> Self {
        Self {
            catalog,
            paylines: PAYLINES.to_vec(),
        }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    /// Score a grid. Pure: the same grid always yields the same result.
    pub fn evaluate(&self, grid: &Grid) -> SpinResult {
        let cells = grid.cells();
        let line_wins: Vec<LineWin> = self
            .paylines
            .iter()
            .filter_map(|line| self.evaluate_line(&cells, line))
            .collect();

        SpinResult {
            grid: *grid,
            line_win: line_wins.iter().map(|w| w.win_amount).sum(),
            scatter_count: grid.count(SymbolId::SCATTER),
            line_wins,
        }
    }

    fn evaluate_line(&self, cells: &[SymbolId], line: &Payline) -> Option<LineWin> {
        let first = cells[line.cells[0]];
        // Scatter never anchors a line
        if first.is_scatter() {
            return None;
        }

        let match_count = line
            .cells
            .iter()
            .take_while(|&&idx| cells[idx] == first)
            .count();
        if match_count < MIN_PAYING_RUN {
            return None;
        }

        let win_amount = self.catalog.payout_for(first, match_count);
        if win_amount <= 0.0 {
            return None;
        }

        Some(LineWin {
            line_index: line.index,
            symbol: first,
            match_count,
            win_amount,
            cells: line.cells[..match_count].to_vec(),
        })
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_CELLS;
    use crate::symbols::SymbolId::*;

    /// Neighbouring cells along every line differ, so nothing pays
    fn losing_grid() -> Grid {
        const PATTERN: [SymbolId; 4] = [Zombie, Blood, Book, Ghost];
        Grid::from_cells(std::array::from_fn(|i| {
            PATTERN[(i / GRID_COLS + 2 * (i % GRID_COLS)) % 4]
        }))
    }

    #[test]
    fn test_paylines_in_bounds() {
        for line in PAYLINES {
            assert!(line.cells.iter().all(|&c| c < GRID_CELLS));
        }
    }

    #[test]
    fn test_three_of_a_kind_pays_table_value() {
        let table = PayTable::standard();
        let mut cells = losing_grid().cells();
        // Row 0: Ghost Ghost Ghost Book Skull
        cells[0] = Ghost;
        cells[1] = Ghost;
        cells[2] = Ghost;
        cells[3] = Book;
        cells[4] = Skull;
        // Break the first column and the main diagonal
        cells[5] = Candle;
        cells[6] = Candle;
        let result = table.evaluate(&Grid::from_cells(cells));

        assert_eq!(result.line_wins.len(), 1);
        assert_eq!(result.line_wins[0].line_index, 0);
        assert_eq!(result.line_wins[0].match_count, 3);
        assert_eq!(result.line_win, table.catalog().payout_for(Ghost, 3));
        assert_eq!(result.line_win, 2.5);
    }

    #[test]
    fn test_scatter_led_line_pays_nothing() {
        let table = PayTable::standard();
        let mut cells = losing_grid().cells();
        cells[20] = FreeSpin;
        cells[21..25].fill(Skull);
        let result = table.evaluate(&Grid::from_cells(cells));
        assert_eq!(result.line_win, 0.0);
        assert_eq!(result.scatter_count, 1);
    }

    #[test]
    fn test_no_runs_no_win() {
        let result = PayTable::standard().evaluate(&losing_grid());
        assert_eq!(result.line_win, 0.0);
        assert!(result.line_wins.is_empty());
        assert!(!result.is_win());
    }

    #[test]
    fn test_full_grid_pays_every_line_at_top_entry() {
        let table = PayTable::standard();
        let result = table.evaluate(&Grid::filled(Book));
        assert_eq!(result.line_wins.len(), 10);
        assert!(result.line_wins.iter().all(|w| w.match_count == 5));
        assert_eq!(result.line_win, 10.0 * 4.0);
    }

    #[test]
    fn test_run_stops_at_first_mismatch() {
        let table = PayTable::standard();
        let mut cells = losing_grid().cells();
        // Row 2: Skull Skull Candle Skull Skull
        cells[10] = Skull;
        cells[11] = Skull;
        cells[12] = Candle;
        cells[13] = Skull;
        cells[14] = Skull;
        let result = table.evaluate(&Grid::from_cells(cells));
        assert!(result.line_wins.iter().all(|w| w.line_index != 2));
    }

    #[test]
    fn test_scatter_count_anywhere() {
        let table = PayTable::standard();
        let mut cells = losing_grid().cells();
        cells[3] = FreeSpin;
        cells[11] = FreeSpin;
        cells[24] = FreeSpin;
        let result = table.evaluate(&Grid::from_cells(cells));
        assert_eq!(result.scatter_count, 3);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let table = PayTable::standard();
        let grid = Grid::filled(Skull);
        assert_eq!(table.evaluate(&grid), table.evaluate(&grid));
    }
}
