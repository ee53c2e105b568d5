/*!
 * Process Module
 * Simulated process entities, their registry, resources and scheduling
 */

pub mod registry;
pub mod resources;
pub mod scheduler;
pub mod types;

// Re-export for convenience
pub use registry::ProcessRegistry;
pub use resources::{
    Allocation, FixedAllocator, RandomAllocator, ResourceAllocator, ScriptedAllocator,
};
pub use scheduler::{ClockStats, SchedulerClock};
pub use types::{Process, ProcessKind, ProcessState, UnknownKind};
