//! Autospin scheduler
//!
//! Runs a fixed number of spins on a worker thread at the cadence of the
//! selected speed. Ticks are strictly sequential; each spin completes under
//! the engine lock before the next interval starts. Stopping joins the
//! worker, so no spin starts after `stop_autospin` returns.
//!
//! Each run publishes its reports on a channel of its own. The worker holds
//! the only sender, so the stream ends when the run does.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::engine::SharedEngine;
use crate::error::{SlotError, SlotResult};
use crate::spin::SpinReport;
use crate::timing::SpinSpeed;

/// One cancellable autospin stream per session
pub struct AutospinScheduler {
    engine: SharedEngine,
    speed: SpinSpeed,
    /// True from `start_autospin` until the worker exits
    running: Arc<AtomicBool>,
    /// Checked by the worker before every tick
    cancelled: Arc<AtomicBool>,
    spins_completed: Arc<AtomicU32>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    /// Reports of the run started last
    reports: Receiver<SpinReport>,
}

impl AutospinScheduler {
    pub fn new(engine: SharedEngine) -> Self {
        // Disconnected and empty until the first run
        let (_, reports) = unbounded();
        Self {
            engine,
            speed: SpinSpeed::default(),
            running: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            spins_completed: Arc::new(AtomicU32::new(0)),
            stop_tx: None,
            worker: None,
            reports,
        }
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn speed(&self) -> SpinSpeed {
        self.speed
    }

    /// Change the speed for the next run. Locked while a run is active.
    pub fn set_speed(&mut self, speed: SpinSpeed) -> SlotResult<()> {
        if self.is_running() {
            return Err(SlotError::SpeedLocked);
        }
        self.speed = speed;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spins executed by the current (or last) run
    pub fn spins_completed(&self) -> u32 {
        self.spins_completed.load(Ordering::SeqCst)
    }

    /// Reports of the current (or last) run, one per tick.
    ///
    /// Take it after `start_autospin`; a receiver from an earlier run only
    /// sees that run.
    pub fn reports(&self) -> Receiver<SpinReport> {
        self.reports.clone()
    }

    /// Tick interval for the current speed
    pub fn interval(&self) -> Duration {
        self.engine.lock().config().timing.autospin_interval(self.speed)
    }

    /// Start `count` spins at `speed`, the first one after a single interval
    pub fn start_autospin(&mut self, count: u32, speed: SpinSpeed) -> SlotResult<()> {
        if count == 0 {
            return Err(SlotError::InvalidAutospinCount(count));
        }
        if self.is_running() {
            return Err(SlotError::AlreadyRunning);
        }
        // Reap a run that finished on its own
        self.join_worker();

        self.speed = speed;
        let interval = self.interval();

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let engine = Arc::clone(&self.engine);
        let running = Arc::clone(&self.running);
        let cancelled = Arc::clone(&self.cancelled);
        let completed = Arc::clone(&self.spins_completed);
        let (reports, report_rx) = unbounded();

        cancelled.store(false, Ordering::SeqCst);
        completed.store(0, Ordering::SeqCst);
        running.store(true, Ordering::SeqCst);

        let spawned = thread::Builder::new()
            .name("rf-autospin".into())
            .spawn(move || {
                for _ in 0..count {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if cancelled.load(Ordering::SeqCst) {
                        break;
                    }

                    let report = engine.lock().spin();
                    completed.fetch_add(1, Ordering::SeqCst);
                    // Nobody listening is fine
                    let _ = reports.send(report);
                }

                running.store(false, Ordering::SeqCst);
                log::info!(
                    "Autospin finished after {} spins",
                    completed.load(Ordering::SeqCst)
                );
            });

        match spawned {
            Ok(handle) => {
                self.stop_tx = Some(stop_tx);
                self.worker = Some(handle);
                self.reports = report_rx;
                log::info!("Autospin started: {} spins at {} ({:?})", count, speed, interval);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(SlotError::Io(e))
            }
        }
    }

    /// Cancel the run and wait for the worker. Idempotent.
    ///
    /// A spin already in flight completes; no further spin starts.
    pub fn stop_autospin(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        if self.worker.is_some() {
            self.join_worker();
            log::info!("Autospin stopped after {} spins", self.spins_completed());
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Block until the current run finishes on its own
    pub fn wait(&mut self) {
        self.join_worker();
        self.stop_tx = None;
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Autospin worker panicked");
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }
}

impl Drop for AutospinScheduler {
    fn drop(&mut self) {
        self.stop_autospin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlotConfig;
    use crate::engine::SlotEngine;
    use crate::timing::TimingConfig;

    fn scheduler(base_interval_ms: u64) -> AutospinScheduler {
        let engine = SlotEngine::with_config(SlotConfig {
            seed: Some(7),
            timing: TimingConfig {
                base_interval_ms,
                ..TimingConfig::instant()
            },
            ..SlotConfig::default()
        })
        .unwrap();
        AutospinScheduler::new(engine.into_shared())
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut autospin = scheduler(1);
        assert!(matches!(
            autospin.start_autospin(0, SpinSpeed::Normal),
            Err(SlotError::InvalidAutospinCount(0))
        ));
        assert!(!autospin.is_running());
    }

    #[test]
    fn test_interval_follows_speed() {
        let mut autospin = scheduler(1000);
        assert_eq!(autospin.interval(), Duration::from_millis(1000));
        autospin.set_speed(SpinSpeed::SuperTurbo).unwrap();
        assert_eq!(autospin.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_runs_exact_count() {
        let mut autospin = scheduler(5);
        autospin.start_autospin(4, SpinSpeed::Turbo).unwrap();
        autospin.wait();
        assert!(!autospin.is_running());
        assert_eq!(autospin.spins_completed(), 4);
        assert_eq!(autospin.reports().try_iter().count(), 4);
        assert_eq!(autospin.engine().lock().spin_count(), 4);
    }

    #[test]
    fn test_each_run_has_its_own_reports() {
        let mut autospin = scheduler(5);
        assert_eq!(autospin.reports().iter().count(), 0);

        autospin.start_autospin(3, SpinSpeed::Turbo).unwrap();
        let first = autospin.reports();
        autospin.wait();
        autospin.start_autospin(2, SpinSpeed::Turbo).unwrap();
        autospin.wait();

        let second: Vec<_> = autospin.reports().iter().collect();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].spin_index, 4);
        assert_eq!(first.iter().count(), 3);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut autospin = scheduler(10_000);
        autospin.start_autospin(3, SpinSpeed::Normal).unwrap();
        autospin.stop_autospin();
        autospin.stop_autospin();
        assert!(!autospin.is_running());
        assert_eq!(autospin.spins_completed(), 0);
    }
}
