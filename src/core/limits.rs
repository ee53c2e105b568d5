/*!
 * System Limits and Constants
 *
 * Centralized location for the engine's fixed limits and defaults.
 * Organized by domain for maintainability and discoverability.
 */

use super::types::{Bytes, IntervalMs, ThreadCount};

// =============================================================================
// SCHEDULER CLOCK
// =============================================================================

/// Floor for the global tick period (100ms)
/// Interval adjustments below this are clamped, never rejected
pub const MIN_INTERVAL_MS: IntervalMs = 100;

/// Default tick period (1 second)
pub const DEFAULT_INTERVAL_MS: IntervalMs = 1000;

/// Conventional size of one interval adjustment step
/// `adjust_interval` accepts any delta; this is only the customary increment
pub const INTERVAL_STEP_MS: i64 = 100;

/// Number of ticks for a process to complete running -> waiting -> ready
pub const ROTATION_PERIOD_TICKS: u64 = 3;

// =============================================================================
// PROCESS RESOURCES
// =============================================================================

/// Fewest threads a simulated process can carry
pub const MIN_THREADS: ThreadCount = 1;

/// Most threads a simulated process can carry
pub const MAX_THREADS: ThreadCount = 5;

/// Allocation granularity for simulated memory (4KB)
pub const PAGE_SIZE: Bytes = 4 * 1024;

/// Default lower bound for a process memory draw (4KB, one page)
pub const DEFAULT_MEMORY_MIN: Bytes = PAGE_SIZE;

/// Default upper bound for a process memory draw (16MB)
pub const DEFAULT_MEMORY_MAX: Bytes = 16 * 1024 * 1024;

// =============================================================================
// EVENTS
// =============================================================================

/// Default buffer size of the engine event channel
/// Slow subscribers lag (and skip events) rather than block the engine
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

// =============================================================================
// DEADLOCK HEURISTIC
// =============================================================================

/// Deadlock is flagged when strictly more than this many processes are waiting
pub const DEADLOCK_WAITING_THRESHOLD: usize = 1;

/// Status message while the heuristic is active
pub const DEADLOCK_DETECTED_MESSAGE: &str = "Deadlock detectado!";

/// Status message while the heuristic is inactive
pub const NO_DEADLOCK_MESSAGE: &str = "Nenhum deadlock detectado.";
