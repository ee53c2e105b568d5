/*!
 * Process Resources
 * Creation-time resource assignment for simulated processes
 */

mod allocator;

#[cfg(test)]
pub use allocator::MockResourceAllocator;
pub use allocator::{
    Allocation, FixedAllocator, RandomAllocator, ResourceAllocator, ScriptedAllocator,
};
