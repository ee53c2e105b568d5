/*!
 * Scheduler Clock - Periodic Rotation Driver
 *
 * Background task that applies one engine tick per interval. One task per
 * clock instance owns the only timer. The task follows the engine's period
 * through a watch channel and swaps its timer on every change, so two
 * drivers never run side by side and the period can be changed through
 * either the clock or the engine.
 *
 * # Shutdown
 *
 * 1. **Preferred:** `shutdown().await` marks the clock stopped, asks the task
 *    to exit and awaits it.
 * 2. **Fallback:** `Drop` marks the clock stopped and aborts the task,
 *    logging a warning.
 *
 * The stopped flag is set while holding the engine lock and every tick
 * checks it under the same lock, so no tick is observable once either path
 * has returned. Do not drop or shut down a clock while holding the engine
 * lock yourself.
 *
 * # Example Usage
 *
 * ```no_run
 * # use simuvos_kernel::{Engine, ProcessKind, SchedulerClock};
 * # async fn example() {
 * let engine = Engine::default().into_shared();
 * let clock = SchedulerClock::spawn(engine.clone());
 *
 * engine.lock().create(ProcessKind::CpuBound);
 * clock.adjust_interval(-100);
 *
 * clock.shutdown().await;
 * # }
 * ```
 */

use crate::core::types::IntervalMs;
use crate::engine::{IntervalUpdate, SharedEngine};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, trace, warn};

/// Control messages for the clock task
#[derive(Debug, Clone)]
pub enum ClockCommand {
    /// Apply one tick right away
    Trigger,
    /// Exit the task
    Shutdown,
}

/// Point-in-time view of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockStats {
    pub ticks: u64,
    pub interval_ms: IntervalMs,
    pub paused: bool,
}

/// Handle to the periodic driver
pub struct SchedulerClock {
    engine: SharedEngine,
    command_tx: mpsc::UnboundedSender<ClockCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
}

impl SchedulerClock {
    /// Spawn the driver on the current tokio runtime
    ///
    /// The first tick fires one full period after the call.
    pub fn spawn(engine: SharedEngine) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let paused = Arc::new(AtomicBool::new(false));

        // Read the period and subscribe under one lock so no change is missed
        let (interval_ms, interval_rx) = {
            let engine = engine.lock();
            (engine.interval_ms(), engine.watch_interval())
        };
        let timer = periodic_timer(interval_ms, Instant::now());

        let handle = tokio::spawn(run_clock_loop(
            Arc::clone(&engine),
            Arc::clone(&stopped),
            Arc::clone(&paused),
            command_rx,
            interval_rx,
            timer,
        ));

        info!(interval_ms, "Scheduler clock spawned");

        Self {
            engine,
            command_tx,
            handle: Some(handle),
            stopped,
            paused,
        }
    }

    /// Shift the period by `delta_ms` (floor 100ms) and restart the timer
    ///
    /// Same as `Engine::adjust_interval`; the driver only keeps the latest
    /// period, so concurrent adjustments leave the timer on the final one.
    pub fn adjust_interval(&self, delta_ms: i64) -> IntervalMs {
        self.engine.lock().adjust_interval(delta_ms)
    }

    /// Current global period
    pub fn interval_ms(&self) -> IntervalMs {
        self.engine.lock().interval_ms()
    }

    /// Stop applying ticks until `resume`; the timer keeps its phase
    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::SeqCst) {
            info!("Scheduler clock paused");
        }
    }

    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            info!("Scheduler clock resumed");
        }
    }

    /// Apply one tick immediately, outside the timer (ignored while paused)
    pub fn trigger(&self) {
        let _ = self.command_tx.send(ClockCommand::Trigger);
    }

    #[must_use]
    pub fn stats(&self) -> ClockStats {
        let engine = self.engine.lock();
        ClockStats {
            ticks: engine.ticks(),
            interval_ms: engine.interval_ms(),
            paused: self.paused.load(Ordering::SeqCst),
        }
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Whether the driver task is still alive
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Stop the driver gracefully and wait for the task to exit
    ///
    /// Consumes self, so a clock cannot be shut down twice.
    pub async fn shutdown(mut self) {
        self.mark_stopped();
        let _ = self.command_tx.send(ClockCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Scheduler clock shutdown error");
            } else {
                info!("Scheduler clock shutdown complete");
            }
        }
    }

    fn mark_stopped(&self) {
        let _engine = self.engine.lock();
        self.stopped.store(true, Ordering::SeqCst);
    }
}

impl Drop for SchedulerClock {
    fn drop(&mut self) {
        // Graceful shutdown already took the handle
        if let Some(handle) = self.handle.take() {
            warn!(
                "SchedulerClock dropped without calling shutdown() - aborting driver. \
                 Use `clock.shutdown().await` for graceful cleanup."
            );
            self.mark_stopped();
            handle.abort();
        }
    }
}

fn periodic_timer(interval_ms: IntervalMs, from: Instant) -> Interval {
    let period = Duration::from_millis(interval_ms);
    let mut timer = tokio::time::interval_at(from + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Apply one tick unless the clock was stopped
fn tick_once(engine: &SharedEngine, stopped: &AtomicBool) {
    let mut engine = engine.lock();
    if stopped.load(Ordering::SeqCst) {
        return;
    }
    let outcome = engine.tick();
    trace!(tick = outcome.tick, changed = outcome.changed, "Clock tick");
}

async fn run_clock_loop(
    engine: SharedEngine,
    stopped: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    mut command_rx: mpsc::UnboundedReceiver<ClockCommand>,
    mut interval_rx: watch::Receiver<IntervalUpdate>,
    mut timer: Interval,
) {
    info!(
        period_ms = timer.period().as_millis() as u64,
        "Scheduler clock loop started"
    );

    loop {
        tokio::select! {
            _ = timer.tick() => {
                if !paused.load(Ordering::SeqCst) {
                    tick_once(&engine, &stopped);
                }
            }

            changed = interval_rx.changed() => {
                if changed.is_err() {
                    info!("Interval channel closed, scheduler clock exiting");
                    break;
                }
                let IntervalUpdate { interval_ms, at } = *interval_rx.borrow_and_update();
                info!(interval_ms, "Scheduler clock period updated");
                timer = periodic_timer(interval_ms, at);
            }

            cmd = command_rx.recv() => {
                match cmd {
                    Some(ClockCommand::Trigger) => {
                        if !paused.load(Ordering::SeqCst) {
                            tick_once(&engine, &stopped);
                            trace!("Manual clock trigger");
                        }
                    }

                    Some(ClockCommand::Shutdown) | None => {
                        info!("Scheduler clock shutting down");
                        break;
                    }
                }
            }
        }
    }
}
