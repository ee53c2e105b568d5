/*!
 * Deadlock Detector
 *
 * Heuristic detector: more than one simultaneously waiting process counts as
 * a deadlock. No wait-for graph is built.
 *
 * Two outputs are derived on each evaluation:
 * - a continuous status that always mirrors the current condition
 * - a one-shot notification latched by `notified_once`, fired the first
 *   time the condition is seen and re-armed only by `reset_notification`
 */

use crate::core::limits::{
    DEADLOCK_DETECTED_MESSAGE, DEADLOCK_WAITING_THRESHOLD, NO_DEADLOCK_MESSAGE,
};
use crate::process::types::Process;
use serde::Serialize;
use tracing::{debug, warn};

/// Current deadlock condition as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlockStatus {
    pub active: bool,
    pub message: &'static str,
}

impl DeadlockStatus {
    #[must_use]
    pub const fn from_active(active: bool) -> Self {
        Self {
            active,
            message: if active {
                DEADLOCK_DETECTED_MESSAGE
            } else {
                NO_DEADLOCK_MESSAGE
            },
        }
    }
}

impl Default for DeadlockStatus {
    fn default() -> Self {
        Self::from_active(false)
    }
}

/// Listener for the one-shot notification
///
/// Listeners run synchronously inside the evaluation and must not call back
/// into the engine that owns the detector.
pub type DeadlockListener = Box<dyn Fn(&DeadlockStatus) + Send + Sync>;

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub status: DeadlockStatus,
    pub waiting: usize,
    /// Whether this evaluation fired the one-shot notification
    pub notified: bool,
}

#[derive(Default)]
pub struct DeadlockDetector {
    active: bool,
    notified_once: bool,
    notifications: u64,
    listeners: Vec<DeadlockListener>,
}

impl DeadlockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the status from the given processes
    pub fn evaluate<'a, I>(&mut self, processes: I) -> Evaluation
    where
        I: IntoIterator<Item = &'a Process>,
    {
        let waiting = processes.into_iter().filter(|p| p.is_waiting()).count();
        self.evaluate_waiting(waiting)
    }

    /// Recompute the status from a waiting-process count
    pub fn evaluate_waiting(&mut self, waiting: usize) -> Evaluation {
        let was_active = self.active;
        self.active = waiting > DEADLOCK_WAITING_THRESHOLD;
        let status = DeadlockStatus::from_active(self.active);

        if self.active != was_active {
            debug!(active = self.active, waiting, "Deadlock status changed");
        }

        let notified = self.active && !self.notified_once;
        if notified {
            self.notified_once = true;
            self.notifications += 1;
            warn!(waiting, "{}", status.message);
            for listener in &self.listeners {
                listener(&status);
            }
        }

        Evaluation {
            status,
            waiting,
            notified,
        }
    }

    /// Register a listener for the one-shot notification
    pub fn on_first_deadlock_notified<F>(&mut self, listener: F)
    where
        F: Fn(&DeadlockStatus) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Re-arm the one-shot notification
    ///
    /// The next evaluation that finds the condition active fires again, even
    /// if the condition never cleared in between.
    pub fn reset_notification(&mut self) {
        debug!("Deadlock notification re-armed");
        self.notified_once = false;
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> DeadlockStatus {
        DeadlockStatus::from_active(self.active)
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn notified_once(&self) -> bool {
        self.notified_once
    }

    /// Notifications fired over the detector's lifetime
    #[inline]
    #[must_use]
    pub fn notification_count(&self) -> u64 {
        self.notifications
    }
}

impl std::fmt::Debug for DeadlockDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlockDetector")
            .field("active", &self.active)
            .field("notified_once", &self.notified_once)
            .field("notifications", &self.notifications)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(detector: &mut DeadlockDetector) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let hook = Arc::clone(&count);
        detector.on_first_deadlock_notified(move |status| {
            assert!(status.active);
            hook.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_threshold_is_strictly_more_than_one() {
        let mut detector = DeadlockDetector::new();

        assert!(!detector.evaluate_waiting(0).status.active);
        assert!(!detector.evaluate_waiting(1).status.active);
        assert!(detector.evaluate_waiting(2).status.active);
    }

    #[test]
    fn test_messages() {
        assert_eq!(DeadlockStatus::from_active(true).message, "Deadlock detectado!");
        assert_eq!(
            DeadlockStatus::from_active(false).message,
            "Nenhum deadlock detectado."
        );
        assert_eq!(DeadlockDetector::new().status(), DeadlockStatus::default());
    }

    #[test]
    fn test_notification_fires_once_until_reset() {
        let mut detector = DeadlockDetector::new();
        let fired = counting(&mut detector);

        assert!(detector.evaluate_waiting(2).notified);
        assert!(!detector.evaluate_waiting(3).notified);
        detector.evaluate_waiting(0);
        assert!(!detector.evaluate_waiting(2).notified);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        detector.reset_notification();
        assert!(!detector.notified_once());
        detector.evaluate_waiting(1);
        assert!(detector.evaluate_waiting(2).notified);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(detector.notification_count(), 2);
    }

    #[test]
    fn test_reset_while_active_fires_on_next_evaluation() {
        let mut detector = DeadlockDetector::new();
        let fired = counting(&mut detector);

        detector.evaluate_waiting(2);
        detector.reset_notification();
        detector.evaluate_waiting(2);

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_status_follows_condition_after_notification() {
        let mut detector = DeadlockDetector::new();

        detector.evaluate_waiting(4);
        assert!(detector.is_active());
        detector.evaluate_waiting(1);
        assert_eq!(detector.status(), DeadlockStatus::from_active(false));
        assert!(detector.notified_once());
    }

    #[test]
    fn test_all_listeners_notified() {
        let mut detector = DeadlockDetector::new();
        let a = counting(&mut detector);
        let b = counting(&mut detector);

        detector.evaluate_waiting(2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }
}
