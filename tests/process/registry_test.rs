/*!
 * Process Registry Tests
 * Creation, removal and lifetime counters through the engine commands
 */

use pretty_assertions::assert_eq;
use simuvos_kernel::{
    Allocation, Engine, FixedAllocator, ProcessKind, ProcessState, ScriptedAllocator,
};
use std::sync::Arc;

fn scripted_engine() -> Engine {
    let script = vec![
        Allocation::new(4096, 1).unwrap(),
        Allocation::new(8192, 3).unwrap(),
        Allocation::new(12288, 5).unwrap(),
    ];
    Engine::new(Arc::new(ScriptedAllocator::new(script).unwrap()))
}

#[test]
fn test_create_process_returns_ready_process() {
    let mut engine = Engine::new(Arc::new(FixedAllocator::new(65536, 4).unwrap()));
    let process = engine.create_process(ProcessKind::CpuBound, 1000);

    assert_eq!(process.id, 1);
    assert_eq!(process.kind, ProcessKind::CpuBound);
    assert_eq!(process.state, ProcessState::Ready);
    assert_eq!(process.elapsed_secs, 0);
    assert_eq!(process.creation_time_slice_ms, 1000);
    assert_eq!(process.allocated_memory_bytes, 65536);
    assert_eq!(process.thread_count, 4);
}

#[test]
fn test_stop_only_process_empties_registry() {
    let mut engine = scripted_engine();
    engine.create_process(ProcessKind::CpuBound, 1000);

    assert!(engine.stop_process(1));
    assert!(engine.snapshot().is_empty());
    assert_eq!(engine.total_allocated_memory(), 0);
    assert_eq!(engine.total_created(), 1);
}

#[test]
fn test_stop_unknown_id_is_noop() {
    let mut engine = scripted_engine();
    engine.create_process(ProcessKind::IoBound, 1000);

    assert!(!engine.stop_process(99));
    assert_eq!(engine.snapshot().len(), 1);
    assert_eq!(engine.total_allocated_memory(), 4096);
}

#[test]
fn test_accessors_for_live_and_removed_ids() {
    let mut engine = scripted_engine();
    for kind in [ProcessKind::CpuBound, ProcessKind::IoBound, ProcessKind::IoBoundTerminal] {
        engine.create(kind);
    }

    assert_eq!(engine.memory_for(2), Some(8192));
    assert_eq!(engine.thread_count_for(3), Some(5));
    assert_eq!(engine.total_allocated_memory(), 4096 + 8192 + 12288);

    engine.stop_process(2);
    assert_eq!(engine.memory_for(2), None);
    assert_eq!(engine.thread_count_for(2), None);
    assert!(engine.process(2).is_none());
    assert_eq!(engine.total_allocated_memory(), 4096 + 12288);
}

#[test]
fn test_snapshot_keeps_creation_order() {
    let mut engine = scripted_engine();
    for _ in 0..5 {
        engine.create(ProcessKind::CpuAndIoBoundTape);
    }
    engine.stop_process(2);
    engine.stop_process(4);
    engine.create(ProcessKind::CpuBound);

    let ids: Vec<_> = engine.snapshot().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 5, 6]);
}

#[test]
fn test_stop_all_keeps_total_created() {
    let mut engine = scripted_engine();
    for _ in 0..3 {
        engine.create(ProcessKind::CpuBound);
    }
    let created = engine.total_created();

    assert_eq!(engine.stop_all(), 3);
    assert!(engine.snapshot().is_empty());
    assert_eq!(engine.total_allocated_memory(), 0);
    assert_eq!(engine.total_created(), created);

    let next = engine.create(ProcessKind::CpuBound);
    assert_eq!(next.id, 4);
}

#[test]
fn test_resources_fixed_for_lifetime() {
    let mut engine = scripted_engine();
    let created = engine.create(ProcessKind::IoBoundTape);

    for _ in 0..10 {
        engine.tick();
        let live = engine.process(created.id).unwrap();
        assert_eq!(live.thread_count, created.thread_count);
        assert_eq!(live.allocated_memory_bytes, created.allocated_memory_bytes);
        assert_eq!(live.creation_time_slice_ms, created.creation_time_slice_ms);
    }
}

#[test]
fn test_elapsed_counter_is_external() {
    let mut engine = scripted_engine();
    engine.create(ProcessKind::CpuBound);

    engine.tick();
    assert_eq!(engine.process(1).unwrap().elapsed_secs, 0);

    engine.advance_elapsed(5);
    assert_eq!(engine.process(1).unwrap().elapsed_secs, 5);
    assert_eq!(engine.process(1).unwrap().state, ProcessState::Running);
}
