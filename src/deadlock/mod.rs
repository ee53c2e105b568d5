/*!
 * Deadlock Module
 * Waiting-count heuristic with a latched one-shot notification
 */

pub mod detector;

pub use detector::{DeadlockDetector, DeadlockListener, DeadlockStatus, Evaluation};
