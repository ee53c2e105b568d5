/*!
 * Rotation Tests
 * Lockstep three-tick cycle observed through the engine snapshot
 */

use pretty_assertions::assert_eq;
use simuvos_kernel::{Engine, FixedAllocator, ProcessKind, ProcessState};
use std::sync::Arc;

fn engine() -> Engine {
    Engine::new(Arc::new(FixedAllocator::new(4096, 2).unwrap()))
}

fn states(engine: &Engine) -> Vec<ProcessState> {
    engine.snapshot().iter().map(|p| p.state).collect()
}

#[test]
fn test_single_process_cycle() {
    let mut engine = engine();
    engine.create(ProcessKind::CpuBound);

    let cycle = [ProcessState::Running, ProcessState::Waiting, ProcessState::Ready];
    for tick in 0..9 {
        engine.tick();
        assert_eq!(states(&engine), vec![cycle[tick % 3]], "tick {}", tick + 1);
    }
}

#[test]
fn test_processes_created_together_stay_in_lockstep() {
    let mut engine = engine();
    for kind in ProcessKind::ALL {
        engine.create(kind);
    }

    for _ in 0..7 {
        engine.tick();
        let snapshot = states(&engine);
        assert!(snapshot.windows(2).all(|w| w[0] == w[1]));
    }
}

#[test]
fn test_late_process_starts_own_cycle() {
    let mut engine = engine();
    engine.create(ProcessKind::CpuBound);
    engine.tick();
    engine.create(ProcessKind::IoBound);

    engine.tick();
    assert_eq!(states(&engine), vec![ProcessState::Waiting, ProcessState::Running]);

    engine.tick();
    assert_eq!(states(&engine), vec![ProcessState::Ready, ProcessState::Waiting]);

    engine.tick();
    assert_eq!(states(&engine), vec![ProcessState::Running, ProcessState::Ready]);
}

#[test]
fn test_tick_counts_state_changes() {
    let mut engine = engine();
    assert_eq!(engine.tick().changed, 0);

    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);
    let outcome = engine.tick();
    assert_eq!(outcome.tick, 2);
    assert_eq!(outcome.changed, 2);
    assert_eq!(engine.ticks(), 2);
}
