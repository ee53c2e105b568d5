/*!
 * Process Registry
 * Owns the live simulated processes and the lifetime counters
 *
 * Processes are kept in creation order. Ids come from a lifetime counter and
 * are never reused, so creation order is also ascending id order and lookups
 * can binary search.
 */

use super::resources::ResourceAllocator;
use super::types::{Process, ProcessKind};
use crate::core::types::{Bytes, IntervalMs, Pid, ThreadCount};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ProcessRegistry {
    processes: Vec<Process>,
    total_created: u64,
    total_allocated_memory: Bytes,
    allocator: Arc<dyn ResourceAllocator>,
}

impl ProcessRegistry {
    pub fn new(allocator: Arc<dyn ResourceAllocator>) -> Self {
        Self {
            processes: Vec::new(),
            total_created: 0,
            total_allocated_memory: 0,
            allocator,
        }
    }

    /// Create a process in `ready` and assign its resources
    pub fn create(&mut self, kind: ProcessKind, current_interval_ms: IntervalMs) -> Process {
        // Saturates at u64::MAX creations, far beyond any simulation run
        let id = self.total_created.saturating_add(1);
        self.total_created = id;

        let allocation = self.allocator.allocate();
        let process = Process::new(id, kind, current_interval_ms, allocation);
        self.total_allocated_memory = self
            .total_allocated_memory
            .saturating_add(process.allocated_memory_bytes);
        self.processes.push(process.clone());

        debug!(
            pid = id,
            kind = %kind,
            memory = process.allocated_memory_bytes,
            threads = process.thread_count,
            "Created process"
        );

        process
    }

    /// Remove one process, returning it if it was live
    pub fn stop(&mut self, id: Pid) -> Option<Process> {
        let index = self.index_of(id)?;
        let process = self.processes.remove(index);
        self.total_allocated_memory = self
            .total_allocated_memory
            .saturating_sub(process.allocated_memory_bytes);

        debug!(
            pid = id,
            freed = process.allocated_memory_bytes,
            "Stopped process"
        );
        Some(process)
    }

    /// Remove every live process; the lifetime counter is kept
    pub fn stop_all(&mut self) -> usize {
        let stopped = self.processes.len();
        self.processes.clear();
        self.total_allocated_memory = 0;

        info!(stopped, total_created = self.total_created, "Stopped all processes");
        stopped
    }

    /// Copy of the live processes in creation order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Process> {
        self.processes.clone()
    }

    /// Borrowing view of the live processes in creation order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    #[must_use]
    pub fn get(&self, id: Pid) -> Option<&Process> {
        self.index_of(id).map(|index| &self.processes[index])
    }

    #[must_use]
    pub fn memory_for(&self, id: Pid) -> Option<Bytes> {
        self.get(id).map(|p| p.allocated_memory_bytes)
    }

    #[must_use]
    pub fn thread_count_for(&self, id: Pid) -> Option<ThreadCount> {
        self.get(id).map(|p| p.thread_count)
    }

    #[inline]
    #[must_use]
    pub fn total_allocated_memory(&self) -> Bytes {
        self.total_allocated_memory
    }

    #[inline]
    #[must_use]
    pub fn total_created(&self) -> u64 {
        self.total_created
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    #[must_use]
    pub fn waiting_count(&self) -> usize {
        self.processes.iter().filter(|p| p.is_waiting()).count()
    }

    /// Add seconds to every live process's elapsed counter
    pub fn advance_elapsed(&mut self, secs: u64) {
        for process in &mut self.processes {
            process.elapsed_secs = process.elapsed_secs.saturating_add(secs);
        }
    }

    /// Mutable access for the scheduler's rotation step
    pub(crate) fn processes_mut(&mut self) -> &mut [Process] {
        &mut self.processes
    }

    fn index_of(&self, id: Pid) -> Option<usize> {
        self.processes.binary_search_by_key(&id, |p| p.id).ok()
    }
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("processes", &self.processes)
            .field("total_created", &self.total_created)
            .field("total_allocated_memory", &self.total_allocated_memory)
            .finish_non_exhaustive()
    }
}
