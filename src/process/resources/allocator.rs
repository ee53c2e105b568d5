/*!
 * Resource Allocator
 *
 * Assigns the memory quantity and thread count a simulated process keeps
 * for its whole lifetime. Allocation itself never fails: every contract
 * (positive memory, thread count in 1..=5) is checked when an allocator is
 * constructed.
 *
 * # Implementations
 *
 * - `RandomAllocator`: uniform page-granular memory draw and uniform 1..=5 threads,
 *   optionally seeded for reproducible runs
 * - `FixedAllocator`: the same allocation every time
 * - `ScriptedAllocator`: replays a fixed sequence, cycling when exhausted
 */

use crate::core::config::SimulationConfig;
use crate::core::errors::AllocatorError;
use crate::core::limits::{MAX_THREADS, MIN_THREADS, PAGE_SIZE};
use crate::core::types::{Bytes, ThreadCount};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resources handed to a process at creation
///
/// Fields are private so every value outside this module goes through
/// `Allocation::new`; an out-of-contract allocation cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    memory_bytes: Bytes,
    thread_count: ThreadCount,
}

impl Allocation {
    /// Validated allocation
    pub fn new(memory_bytes: Bytes, thread_count: ThreadCount) -> Result<Self, AllocatorError> {
        if memory_bytes == 0 {
            return Err(AllocatorError::ZeroMemory);
        }
        if !(MIN_THREADS..=MAX_THREADS).contains(&thread_count) {
            return Err(AllocatorError::InvalidThreadCount(thread_count));
        }
        Ok(Self {
            memory_bytes,
            thread_count,
        })
    }

    #[inline]
    #[must_use]
    pub const fn memory_bytes(&self) -> Bytes {
        self.memory_bytes
    }

    #[inline]
    #[must_use]
    pub const fn thread_count(&self) -> ThreadCount {
        self.thread_count
    }
}

/// Creation-time resource assignment strategy
///
/// Implementations must return positive memory and a thread count in 1..=5.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceAllocator: Send + Sync {
    fn allocate(&self) -> Allocation;
}

/// Random allocator backed by a seedable RNG
pub struct RandomAllocator {
    rng: Mutex<StdRng>,
    min_bytes: Bytes,
    max_bytes: Bytes,
}

impl RandomAllocator {
    /// Allocator seeded from OS entropy
    pub fn new(min_bytes: Bytes, max_bytes: Bytes) -> Result<Self, AllocatorError> {
        Self::with_rng(min_bytes, max_bytes, StdRng::from_entropy())
    }

    /// Reproducible allocator
    pub fn seeded(min_bytes: Bytes, max_bytes: Bytes, seed: u64) -> Result<Self, AllocatorError> {
        Self::with_rng(min_bytes, max_bytes, StdRng::seed_from_u64(seed))
    }

    /// Build from the memory range and optional seed of a config
    pub fn from_config(config: &SimulationConfig) -> Result<Self, AllocatorError> {
        match config.seed {
            Some(seed) => Self::seeded(config.memory_min_bytes, config.memory_max_bytes, seed),
            None => Self::new(config.memory_min_bytes, config.memory_max_bytes),
        }
    }

    fn with_rng(min_bytes: Bytes, max_bytes: Bytes, rng: StdRng) -> Result<Self, AllocatorError> {
        if min_bytes == 0 {
            return Err(AllocatorError::ZeroMemory);
        }
        if min_bytes > max_bytes {
            return Err(AllocatorError::InvalidRange {
                min: min_bytes,
                max: max_bytes,
            });
        }
        Ok(Self {
            rng: Mutex::new(rng),
            min_bytes,
            max_bytes,
        })
    }

    #[must_use]
    pub fn memory_range(&self) -> (Bytes, Bytes) {
        (self.min_bytes, self.max_bytes)
    }
}

impl ResourceAllocator for RandomAllocator {
    fn allocate(&self) -> Allocation {
        let mut rng = self.rng.lock();

        // Whole pages when at least one page boundary fits in the range
        let first_page = self.min_bytes.div_ceil(PAGE_SIZE);
        let last_page = self.max_bytes / PAGE_SIZE;
        let memory_bytes = if first_page <= last_page {
            rng.gen_range(first_page..=last_page) * PAGE_SIZE
        } else {
            rng.gen_range(self.min_bytes..=self.max_bytes)
        };

        let thread_count = rng.gen_range(MIN_THREADS..=MAX_THREADS);

        // Both draws stay inside the ranges checked at construction
        Allocation {
            memory_bytes,
            thread_count,
        }
    }
}

/// Allocator that always returns the same allocation
#[derive(Debug, Clone, Copy)]
pub struct FixedAllocator {
    allocation: Allocation,
}

impl FixedAllocator {
    pub fn new(memory_bytes: Bytes, thread_count: ThreadCount) -> Result<Self, AllocatorError> {
        Ok(Self {
            allocation: Allocation::new(memory_bytes, thread_count)?,
        })
    }
}

impl ResourceAllocator for FixedAllocator {
    fn allocate(&self) -> Allocation {
        self.allocation
    }
}

/// Allocator replaying a fixed script, wrapping around at the end
pub struct ScriptedAllocator {
    script: Vec<Allocation>,
    cursor: AtomicUsize,
}

impl ScriptedAllocator {
    pub fn new(script: Vec<Allocation>) -> Result<Self, AllocatorError> {
        if script.is_empty() {
            return Err(AllocatorError::EmptyScript);
        }
        Ok(Self {
            script,
            cursor: AtomicUsize::new(0),
        })
    }
}

impl ResourceAllocator for ScriptedAllocator {
    fn allocate(&self) -> Allocation {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.script.len();
        self.script[index]
    }
}
