//! Shatter Slot command line
//!
//! Usage:
//!   rf-shatter play --spins 20          - Spin and print every result
//!   rf-shatter simulate --spins 100000  - Batch run, print session statistics
//!   rf-shatter autospin --count 10      - Run the autospin scheduler
//!   rf-shatter replay --grid "..."      - Resolve a fixed grid
//!   rf-shatter config                   - Print the effective configuration

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use rf_shatter::{
    AutospinScheduler, Grid, Session, SessionStats, SlotConfig, SlotEngine, SpinReport, SpinSpeed,
};

#[derive(Parser)]
#[command(name = "rf-shatter", about = "Shatter slot engine player and simulator")]
struct Cli {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible session
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Bet size
    #[arg(long, global = true)]
    bet: Option<f64>,

    /// Starting balance
    #[arg(long, global = true)]
    balance: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin and print every result
    Play {
        /// Number of spins
        #[arg(short, long, default_value_t = 10)]
        spins: u32,
        /// Print the grid after each spin
        #[arg(short, long)]
        grid: bool,
    },
    /// Batch run, print session statistics
    Simulate {
        /// Number of spins
        #[arg(short, long, default_value_t = 100_000)]
        spins: u32,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the autospin scheduler
    Autospin {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u32,
        /// normal, turbo or super-turbo
        #[arg(short, long, default_value = "normal")]
        speed: SpinSpeed,
    },
    /// Resolve a fixed grid (25 symbols, row-major, names or glyphs)
    Replay {
        #[arg(short, long)]
        grid: String,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Play { spins, grid } => play(config, spins, grid),
        Commands::Simulate { spins, json } => simulate(config, spins, json),
        Commands::Autospin { count, speed } => autospin(config, count, speed),
        Commands::Replay { grid } => replay(config, &grid),
        Commands::Config => {
            let engine = SlotEngine::with_config(config)?;
            println!("{}", engine.export_config()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<SlotConfig> {
    let mut config = match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SlotConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(balance) = cli.balance {
        config.initial_balance = balance;
    }
    if let Some(bet) = cli.bet {
        config.default_bet = bet;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn play(config: SlotConfig, spins: u32, show_grid: bool) -> Result<()> {
    let mut engine = SlotEngine::with_config(config)?;

    for _ in 0..spins {
        let report = engine.spin();
        print_report(&report, show_grid);
        if report.shattered {
            engine.clear_shatter_display();
        }
    }

    println!();
    print_session(&engine.session());
    Ok(())
}

fn simulate(config: SlotConfig, spins: u32, json: bool) -> Result<()> {
    if spins == 0 {
        bail!("--spins must be at least 1");
    }
    let mut engine = SlotEngine::with_config(config)?;

    let start = Instant::now();
    for _ in 0..spins {
        engine.spin();
    }
    let elapsed = start.elapsed();
    log::info!("Simulated {} spins in {:?}", spins, elapsed);

    if json {
        println!("{}", serde_json::to_string_pretty(engine.stats())?);
    } else {
        print_stats(engine.stats());
        print_session(&engine.session());
    }
    Ok(())
}

fn autospin(config: SlotConfig, count: u32, speed: SpinSpeed) -> Result<()> {
    let interval = config.timing.autospin_interval(speed);
    let shared = SlotEngine::with_config(config)?.into_shared();
    let mut scheduler = AutospinScheduler::new(shared.clone());

    println!("Autospin: {} spins at {} ({:?} per spin)", count, speed, interval);
    scheduler.start_autospin(count, speed)?;

    // Ends with the run, including a run cut short by a panic
    for report in scheduler.reports().iter() {
        print_report(&report, false);
        if report.shattered {
            shared.lock().clear_shatter_display();
        }
    }
    scheduler.wait();

    println!();
    print_session(&shared.lock().session());
    Ok(())
}

fn replay(config: SlotConfig, grid: &str) -> Result<()> {
    let grid = Grid::parse(grid).context("Invalid grid")?;
    let mut engine = SlotEngine::with_config(config)?;
    let report = engine.spin_forced(grid);
    print_report(&report, true);
    print_session(&engine.session());
    Ok(())
}

fn print_report(report: &SpinReport, show_grid: bool) {
    if show_grid {
        println!("{}", report.pre_shatter_grid);
    }
    println!("#{:<5} {}", report.spin_index, report.message);
    if report.shattered {
        for upgrade in &report.upgrades {
            match upgrade.to {
                Some(to) => {
                    println!("       SHATTER {} ×{} -> {}", upgrade.from, upgrade.count, to)
                }
                None => {
                    println!("       SHATTER {} ×{} (top tier)", upgrade.from, upgrade.count)
                }
            }
        }
        println!("       shatter win {:.2}", report.shatter_win);
        if show_grid {
            println!("{}", report.grid);
        }
    }
}

fn print_session(session: &Session) {
    println!("{}", session.ledger_line());
    if session.is_free_spin_mode {
        println!("{} Free Spins Left", session.free_spins_left);
    }
}

fn print_stats(stats: &SessionStats) {
    println!(
        "Spins:        {} ({} base, {} free)",
        stats.total_spins, stats.base_spins, stats.free_spins
    );
    println!("RTP:          {:.2}%", stats.rtp());
    println!("Hit rate:     {:.2}%", stats.hit_rate());
    println!("Shatters:     {} ({:.2}%)", stats.shatters, stats.shatter_rate());
    println!(
        "Bonus:        {} triggers, {} retriggers",
        stats.free_spin_triggers, stats.retriggers
    );
    println!("Max win:      {:.2}", stats.max_win);
}
