/*!
 * Core Types
 * Common types used across the simulation engine
 */

/// Process ID type
///
/// Assigned from the registry's lifetime counter, starting at 1 and never reused.
/// 64 bits so the counter cannot wrap within any realistic run.
pub type Pid = u64;

/// Memory quantity in bytes
pub type Bytes = u64;

/// Number of threads attached to a simulated process (1-5)
pub type ThreadCount = u8;

/// Period of the scheduler clock in milliseconds
pub type IntervalMs = u64;

/// Render an elapsed-seconds counter as `m:ss`
///
/// Minutes are not wrapped into hours, so 3725 seconds renders as `62:05`.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
