/*!
 * Semaphore View
 * Per-process free/blocked flag derived from the current state
 *
 * Holds no state of its own; every answer is recomputed from the registry.
 */

use crate::core::types::Pid;
use crate::process::registry::ProcessRegistry;
use crate::process::types::Process;

pub struct SemaphoreDeriver;

impl SemaphoreDeriver {
    /// A process is free unless it is waiting
    #[inline(always)]
    #[must_use]
    pub const fn derive(process: &Process) -> bool {
        !process.is_waiting()
    }

    /// Flag for one live process, `None` for unknown ids
    #[must_use]
    pub fn free(registry: &ProcessRegistry, id: Pid) -> Option<bool> {
        registry.get(id).map(Self::derive)
    }

    /// `(id, free)` for every live process in creation order
    #[must_use]
    pub fn states(registry: &ProcessRegistry) -> Vec<(Pid, bool)> {
        registry.iter().map(|p| (p.id, Self::derive(p))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::resources::FixedAllocator;
    use crate::process::scheduler::rotation::rotate_all;
    use crate::process::types::ProcessKind;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_free_follows_state() {
        let mut registry = ProcessRegistry::new(Arc::new(FixedAllocator::new(1024, 1).unwrap()));
        registry.create(ProcessKind::CpuBound, 1000);

        // ready -> running -> waiting -> ready
        let expected = [true, false, true];
        assert_eq!(SemaphoreDeriver::free(&registry, 1), Some(true));
        for free in expected {
            rotate_all(registry.processes_mut());
            assert_eq!(SemaphoreDeriver::free(&registry, 1), Some(free));
        }
    }

    #[test]
    fn test_unknown_id() {
        let registry = ProcessRegistry::new(Arc::new(FixedAllocator::new(1024, 1).unwrap()));
        assert_eq!(SemaphoreDeriver::free(&registry, 9), None);
        assert!(SemaphoreDeriver::states(&registry).is_empty());
    }

    #[test]
    fn test_states_in_creation_order() {
        let mut registry = ProcessRegistry::new(Arc::new(FixedAllocator::new(1024, 1).unwrap()));
        registry.create(ProcessKind::CpuBound, 1000);
        rotate_all(registry.processes_mut());
        rotate_all(registry.processes_mut());
        registry.create(ProcessKind::IoBound, 1000);

        assert_eq!(
            SemaphoreDeriver::states(&registry),
            vec![(1, false), (2, true)]
        );
    }
}
