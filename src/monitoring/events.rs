/*!
 * Engine Events
 * Broadcast of engine mutations for presentation layers
 *
 * Uses a tokio broadcast channel: publishing never blocks and is not an
 * error when nobody listens. Subscribers that fall behind the buffer see
 * `RecvError::Lagged` and skip ahead.
 */

use crate::core::limits::DEFAULT_EVENT_CAPACITY;
use crate::core::types::{Bytes, IntervalMs, Pid};
use crate::process::types::ProcessKind;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted by the engine after each command or tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    ProcessCreated {
        pid: Pid,
        kind: ProcessKind,
        memory_bytes: Bytes,
        thread_count: u8,
    },
    ProcessStopped {
        pid: Pid,
        freed_bytes: Bytes,
    },
    AllStopped {
        count: usize,
    },
    Tick {
        tick: u64,
        changed: usize,
        waiting: usize,
    },
    IntervalChanged {
        from_ms: IntervalMs,
        to_ms: IntervalMs,
    },
    DeadlockDetected {
        waiting: usize,
    },
}

/// Event broadcaster implementation
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Arc<broadcast::Sender<EngineEvent>>,
}

impl EventBroadcaster {
    /// Create new broadcaster with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Emit event to all subscribers
    pub fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
