/*!
 * Simulation Engine
 * Single owner of the registry, the deadlock latch and the global tick period
 *
 * Every command is synchronous and runs to completion. Derived views
 * (deadlock status, semaphore flags) are recomputed after each mutation.
 * Multi-threaded callers share the engine as `SharedEngine`, a single mutex
 * that also serializes the periodic driver's ticks with commands.
 */

use crate::core::config::SimulationConfig;
use crate::core::errors::AllocatorError;
use crate::core::limits::{DEFAULT_INTERVAL_MS, MIN_INTERVAL_MS};
use crate::core::types::{Bytes, IntervalMs, Pid, ThreadCount};
use crate::deadlock::{DeadlockDetector, DeadlockStatus, Evaluation};
use crate::monitoring::events::{EngineEvent, EventBroadcaster};
use crate::process::registry::ProcessRegistry;
use crate::process::resources::{RandomAllocator, ResourceAllocator};
use crate::process::scheduler::rotation::rotate_all;
use crate::process::types::{Process, ProcessKind};
use crate::report::ProcessReport;
use crate::semaphore::SemaphoreDeriver;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{info, trace};

/// Engine shared between the caller and the scheduler clock
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Latest global period and when it took effect
///
/// Published on every effective change; the clock restarts its timer so the
/// first tick at the new period lands one full period after `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalUpdate {
    pub interval_ms: IntervalMs,
    pub at: Instant,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// 1-based tick number
    pub tick: u64,
    /// Processes whose state changed
    pub changed: usize,
    pub deadlock: Evaluation,
}

pub struct Engine {
    registry: ProcessRegistry,
    detector: DeadlockDetector,
    interval_ms: IntervalMs,
    interval_tx: watch::Sender<IntervalUpdate>,
    ticks: u64,
    events: EventBroadcaster,
}

impl Engine {
    /// Engine with the default period and event buffer
    pub fn new(allocator: Arc<dyn ResourceAllocator>) -> Self {
        Self::with_allocator(&SimulationConfig::default(), allocator)
    }

    /// Engine with a random allocator built from the config
    pub fn from_config(config: &SimulationConfig) -> Result<Self, AllocatorError> {
        let allocator = RandomAllocator::from_config(config)?;
        Ok(Self::with_allocator(config, Arc::new(allocator)))
    }

    /// Engine with an explicit allocator; the config's memory range is ignored
    pub fn with_allocator(config: &SimulationConfig, allocator: Arc<dyn ResourceAllocator>) -> Self {
        let interval_ms = config.effective_interval_ms();
        info!(
            interval_ms,
            event_capacity = config.event_capacity,
            "Simulation engine initialized"
        );

        let (interval_tx, _) = watch::channel(IntervalUpdate {
            interval_ms,
            at: Instant::now(),
        });

        Self {
            registry: ProcessRegistry::new(allocator),
            detector: DeadlockDetector::new(),
            interval_ms,
            interval_tx,
            ticks: 0,
            events: EventBroadcaster::new(config.event_capacity),
        }
    }

    /// Wrap into the shared handle used by the scheduler clock
    #[must_use]
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Create a process that records `current_interval_ms` as its time slice
    pub fn create_process(&mut self, kind: ProcessKind, current_interval_ms: IntervalMs) -> Process {
        let process = self.registry.create(kind, current_interval_ms);
        self.events.emit(EngineEvent::ProcessCreated {
            pid: process.id,
            kind,
            memory_bytes: process.allocated_memory_bytes,
            thread_count: process.thread_count,
        });
        self.reevaluate();
        process
    }

    /// Create a process stamped with the engine's current period
    pub fn create(&mut self, kind: ProcessKind) -> Process {
        self.create_process(kind, self.interval_ms)
    }

    /// Remove one process; unknown ids are a no-op returning `false`
    pub fn stop_process(&mut self, id: Pid) -> bool {
        match self.registry.stop(id) {
            Some(process) => {
                self.events.emit(EngineEvent::ProcessStopped {
                    pid: id,
                    freed_bytes: process.allocated_memory_bytes,
                });
                self.reevaluate();
                true
            }
            None => false,
        }
    }

    /// Remove every live process; the lifetime counter is not reset
    pub fn stop_all(&mut self) -> usize {
        let count = self.registry.stop_all();
        self.events.emit(EngineEvent::AllStopped { count });
        self.reevaluate();
        count
    }

    /// Shift the global period by `delta_ms`, clamped to the 100ms floor
    ///
    /// A running `SchedulerClock` picks the new period up from here, so this
    /// is the only place the period changes.
    pub fn adjust_interval(&mut self, delta_ms: i64) -> IntervalMs {
        let current = i64::try_from(self.interval_ms).unwrap_or(i64::MAX);
        let floor = MIN_INTERVAL_MS as i64;
        let next = current.saturating_add(delta_ms).max(floor) as IntervalMs;

        if next != self.interval_ms {
            info!(from_ms = self.interval_ms, to_ms = next, "Tick interval adjusted");
            self.events.emit(EngineEvent::IntervalChanged {
                from_ms: self.interval_ms,
                to_ms: next,
            });
            self.interval_ms = next;
            self.interval_tx.send_replace(IntervalUpdate {
                interval_ms: next,
                at: Instant::now(),
            });
        }
        next
    }

    /// Apply one rotation step to every live process
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let changed = rotate_all(self.registry.processes_mut());
        let deadlock = self.reevaluate();

        trace!(tick = self.ticks, changed, waiting = deadlock.waiting, "Tick");
        self.events.emit(EngineEvent::Tick {
            tick: self.ticks,
            changed,
            waiting: deadlock.waiting,
        });

        TickOutcome {
            tick: self.ticks,
            changed,
            deadlock,
        }
    }

    /// Advance the elapsed-time counters kept for the timer display
    pub fn advance_elapsed(&mut self, secs: u64) {
        self.registry.advance_elapsed(secs);
    }

    /// Register a listener for the one-shot deadlock notification
    pub fn on_first_deadlock_notified<F>(&mut self, listener: F)
    where
        F: Fn(&DeadlockStatus) + Send + Sync + 'static,
    {
        self.detector.on_first_deadlock_notified(listener);
    }

    /// Re-arm the one-shot deadlock notification
    pub fn reset_deadlock_notification(&mut self) {
        self.detector.reset_notification();
    }

    fn reevaluate(&mut self) -> Evaluation {
        let evaluation = self.detector.evaluate(self.registry.iter());
        if evaluation.notified {
            self.events.emit(EngineEvent::DeadlockDetected {
                waiting: evaluation.waiting,
            });
        }
        evaluation
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Live processes in creation order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Process> {
        self.registry.snapshot()
    }

    #[must_use]
    pub fn process(&self, id: Pid) -> Option<Process> {
        self.registry.get(id).cloned()
    }

    #[must_use]
    pub fn memory_for(&self, id: Pid) -> Option<Bytes> {
        self.registry.memory_for(id)
    }

    #[must_use]
    pub fn thread_count_for(&self, id: Pid) -> Option<ThreadCount> {
        self.registry.thread_count_for(id)
    }

    #[must_use]
    pub fn total_allocated_memory(&self) -> Bytes {
        self.registry.total_allocated_memory()
    }

    #[must_use]
    pub fn total_created(&self) -> u64 {
        self.registry.total_created()
    }

    #[must_use]
    pub fn interval_ms(&self) -> IntervalMs {
        self.interval_ms
    }

    /// Ticks applied so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn deadlock_status(&self) -> DeadlockStatus {
        self.detector.status()
    }

    #[must_use]
    pub fn deadlock_notified(&self) -> bool {
        self.detector.notified_once()
    }

    /// Free/blocked flag of one process, `None` for unknown ids
    #[must_use]
    pub fn is_free(&self, id: Pid) -> Option<bool> {
        SemaphoreDeriver::free(&self.registry, id)
    }

    #[must_use]
    pub fn semaphore_states(&self) -> Vec<(Pid, bool)> {
        SemaphoreDeriver::states(&self.registry)
    }

    /// Report data for the external report generator
    #[must_use]
    pub fn report(&self, active_elapsed_secs: u64) -> ProcessReport {
        ProcessReport::from_registry(&self.registry, active_elapsed_secs)
    }

    /// Receiver for period changes, with the current period marked as seen
    pub fn watch_interval(&self) -> watch::Receiver<IntervalUpdate> {
        self.interval_tx.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("detector", &self.detector)
            .field("interval_ms", &self.interval_ms)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    /// Engine with an entropy-seeded allocator over the default memory range
    fn default() -> Self {
        let config = SimulationConfig::default().with_interval_ms(DEFAULT_INTERVAL_MS);
        // The default range is valid by construction
        match Self::from_config(&config) {
            Ok(engine) => engine,
            Err(e) => unreachable!("default allocator range rejected: {e}"),
        }
    }
}
