//! Symbol definitions and the weighted symbol catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Payout entries per symbol: 1, 2, 3 and 4+ consecutive matches
pub const PAYOUT_SLOTS: usize = 4;

/// Symbol identifier
///
/// Ordered from the highest paying tier down to the lowest, with the
/// scatter last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolId {
    /// Top tier
    Skull = 0,
    Candle = 1,
    Ghost = 2,
    Book = 3,
    Blood = 4,
    /// Bottom tier
    Zombie = 5,
    /// Scatter ("FS") - never pays on a line, triggers free spins
    FreeSpin = 6,
}

impl SymbolId {
    pub const COUNT: usize = 7;

    pub const ALL: [SymbolId; Self::COUNT] = [
        SymbolId::Skull,
        SymbolId::Candle,
        SymbolId::Ghost,
        SymbolId::Book,
        SymbolId::Blood,
        SymbolId::Zombie,
        SymbolId::FreeSpin,
    ];

    /// The designated scatter symbol
    pub const SCATTER: SymbolId = SymbolId::FreeSpin;

    /// Dense index (0..COUNT)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Skull => "skull",
            Self::Candle => "candle",
            Self::Ghost => "ghost",
            Self::Book => "book",
            Self::Blood => "blood",
            Self::Zombie => "zombie",
            Self::FreeSpin => "free_spin",
        }
    }

    /// Display glyph used by the front-end
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Skull => "💀",
            Self::Candle => "🕯️",
            Self::Ghost => "👻",
            Self::Book => "📖",
            Self::Blood => "🩸",
            Self::Zombie => "🧟",
            Self::FreeSpin => "FS",
        }
    }

    pub fn is_scatter(self) -> bool {
        self == Self::SCATTER
    }

    /// One-step upgrade target used by shatter.
    ///
    /// `None` for the top tier and the scatter.
    pub fn upgrade(self) -> Option<SymbolId> {
        match self {
            Self::Zombie => Some(Self::Blood),
            Self::Blood => Some(Self::Book),
            Self::Book => Some(Self::Ghost),
            Self::Ghost => Some(Self::Candle),
            Self::Candle => Some(Self::Skull),
            Self::Skull | Self::FreeSpin => None,
        }
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for SymbolId {
    type Err = SlotError;

    /// Accepts the snake_case name, the glyph, or "FS"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Candle glyph is sometimes written without the variation selector
        if trimmed == "🕯" {
            return Ok(Self::Candle);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.glyph() == trimmed || id.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| trimmed.eq_ignore_ascii_case("fs").then_some(Self::FreeSpin))
            .ok_or_else(|| SlotError::UnknownSymbol(trimmed.to_string()))
    }
}

/// A symbol's weight and payout curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    pub id: SymbolId,
    /// Relative sampling weight
    pub weight: f64,
    /// Pay for 1, 2, 3 and 4+ consecutive matches
    pub payouts: [f64; PAYOUT_SLOTS],
}

impl SymbolDef {
    pub fn new(id: SymbolId, weight: f64, payouts: [f64; PAYOUT_SLOTS]) -> Self {
        Self {
            id,
            weight,
            payouts,
        }
    }

    /// Pay for a run of `match_count`; runs longer than the table use the top entry
    pub fn payout(&self, match_count: usize) -> f64 {
        if match_count == 0 {
            return 0.0;
        }
        self.payouts[match_count.min(PAYOUT_SLOTS) - 1]
    }
}

/// Immutable weighted symbol table.
///
/// Iteration order is the sampling order and is never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCatalog {
    symbols: Vec<SymbolDef>,
    /// Position of each id inside `symbols`
    index: [usize; SymbolId::COUNT],
    total_weight: f64,
}

impl SymbolCatalog {
    /// The standard horror-themed table
    pub fn standard() -> Self {
        let symbols = vec![
            SymbolDef::new(SymbolId::Skull, 10.0, [0.0, 5.0, 10.0, 100.0]),
            SymbolDef::new(SymbolId::Candle, 15.0, [0.0, 2.0, 5.0, 25.0]),
            SymbolDef::new(SymbolId::Ghost, 20.0, [0.0, 1.0, 2.5, 10.0]),
            SymbolDef::new(SymbolId::Book, 25.0, [0.0, 0.5, 1.0, 4.0]),
            SymbolDef::new(SymbolId::Blood, 30.0, [0.0, 0.2, 0.5, 2.0]),
            SymbolDef::new(SymbolId::Zombie, 30.0, [0.0, 0.2, 0.5, 2.0]),
            SymbolDef::new(SymbolId::FreeSpin, 5.0, [0.0; PAYOUT_SLOTS]),
        ];
        let index = std::array::from_fn(|i| i);
        let total_weight = symbols.iter().map(|s| s.weight).sum();

        Self {
            symbols,
            index,
            total_weight,
        }
    }

    /// Build a catalog from explicit definitions.
    ///
    /// Every symbol id must appear exactly once with a positive finite weight
    /// and non-negative payouts; the scatter must pay zero.
    pub fn new(symbols: Vec<SymbolDef>) -> SlotResult<Self> {
        let mut index = [usize::MAX; SymbolId::COUNT];

        for (pos, def) in symbols.iter().enumerate() {
            let slot = &mut index[def.id.index()];
            if *slot != usize::MAX {
                return Err(SlotError::InvalidConfig(format!(
                    "symbol {} listed twice",
                    def.id.name()
                )));
            }
            *slot = pos;

            if !def.weight.is_finite() || def.weight <= 0.0 {
                return Err(SlotError::InvalidConfig(format!(
                    "symbol {} has non-positive weight {}",
                    def.id.name(),
                    def.weight
                )));
            }
            if def.payouts.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(SlotError::InvalidConfig(format!(
                    "symbol {} has a negative payout",
                    def.id.name()
                )));
            }
            if def.id.is_scatter() && def.payouts.iter().any(|p| *p != 0.0) {
                return Err(SlotError::InvalidConfig(
                    "scatter symbol must not pay on lines".into(),
                ));
            }
        }

        if let Some(missing) = SymbolId::ALL.iter().find(|id| index[id.index()] == usize::MAX) {
            return Err(SlotError::UnknownSymbol(format!(
                "{} missing from catalog",
                missing.name()
            )));
        }

        let total_weight = symbols.iter().map(|s| s.weight).sum();
        Ok(Self {
            symbols,
            index,
            total_weight,
        })
    }

    /// Symbols in sampling order
    pub fn symbols(&self) -> &[SymbolDef] {
        &self.symbols
    }

    pub fn get(&self, id: SymbolId) -> &SymbolDef {
        &self.symbols[self.index[id.index()]]
    }

    /// Pay for `match_count` consecutive `id` symbols on a line
    pub fn payout_for(&self, id: SymbolId, match_count: usize) -> f64 {
        self.get(id).payout(match_count)
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Expected frequency of `id` per cell
    pub fn probability(&self, id: SymbolId) -> f64 {
        self.get(id).weight / self.total_weight
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
