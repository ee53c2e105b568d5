/*!
 * SimuVOS Kernel Library
 * Process lifecycle simulation engine exposed as a library
 */

pub mod core;
pub mod deadlock;
pub mod engine;
pub mod monitoring;
pub mod process;
pub mod report;
pub mod semaphore;

// Re-exports
pub use crate::core::{
    format_elapsed, AllocatorError, Bytes, ConfigError, IntervalMs, KernelError, KernelResult,
    Pid, SimulationConfig, ThreadCount,
};
pub use deadlock::{DeadlockDetector, DeadlockStatus};
pub use engine::{Engine, IntervalUpdate, SharedEngine, TickOutcome};
pub use monitoring::{init_tracing, EngineEvent, EventBroadcaster};
pub use process::{
    Allocation, ClockStats, FixedAllocator, Process, ProcessKind, ProcessRegistry, ProcessState,
    RandomAllocator, ResourceAllocator, SchedulerClock, ScriptedAllocator,
};
pub use report::{ProcessReport, ReportRow};
pub use semaphore::SemaphoreDeriver;
