//! # rf-shatter — Shatter Slot Engine
//!
//! Randomized-outcome 5×5 slot engine with a symbol-upgrade ("shatter")
//! mechanic and a free-spin bonus mode. Rendering is left to the caller; the
//! engine produces grids, scores them and drives the session bankroll.
//!
//! ## Features
//!
//! - **Weighted Catalog**: Seven symbols sampled by weight in fixed order
//! - **Payline Evaluation**: Ten fixed lines, left-to-right runs of 3+
//! - **Shatter**: 8+ of one symbol upgrades every such cell one tier
//! - **Free Spins**: 3+ scatters award 10 free spins, retriggerable
//! - **Autospin**: Cancellable worker at Normal, Turbo or Super Turbo speed
//!
//! ## Architecture
//!
//! ```text
//! AutospinScheduler ──(ticks)──┐
//!                              v
//! SlotEngine (Session, SessionStats)
//!     │
//!     ├── SymbolCatalog → generate_grid()
//!     ├── PayTable (10 paylines) → SpinResult
//!     └── ShatterRule → post-shatter grid
//!           │
//!           v
//!     SpinReport
//! ```

pub mod autospin;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paytable;
pub mod session;
pub mod shatter;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use autospin::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use paytable::*;
pub use session::*;
pub use shatter::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
