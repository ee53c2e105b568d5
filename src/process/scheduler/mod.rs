/*!
 * Scheduler
 * Lockstep state rotation and the periodic clock that drives it
 */

pub mod clock;
pub mod rotation;

pub use clock::{ClockCommand, ClockStats, SchedulerClock};
pub use rotation::{rotate, rotate_all};
