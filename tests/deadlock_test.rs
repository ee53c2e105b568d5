/*!
 * Deadlock Detection Tests
 * Waiting-count heuristic, status messages and the one-shot notification
 */

use pretty_assertions::assert_eq;
use simuvos_kernel::{DeadlockStatus, Engine, EngineEvent, FixedAllocator, ProcessKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn engine_with_counter() -> (Engine, Arc<AtomicUsize>) {
    let mut engine = Engine::new(Arc::new(FixedAllocator::new(4096, 2).unwrap()));
    let fired = Arc::new(AtomicUsize::new(0));
    let hook = Arc::clone(&fired);
    engine.on_first_deadlock_notified(move |status| {
        assert_eq!(status.message, "Deadlock detectado!");
        hook.fetch_add(1, Ordering::SeqCst);
    });
    (engine, fired)
}

#[test]
fn test_initial_status() {
    let (engine, fired) = engine_with_counter();
    assert_eq!(
        engine.deadlock_status(),
        DeadlockStatus {
            active: false,
            message: "Nenhum deadlock detectado."
        }
    );
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn test_two_processes_reach_waiting_together() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::IoBoundTerminal);

    for _ in 0..3 {
        engine.tick();
        if engine.deadlock_status().active {
            break;
        }
    }

    assert_eq!(
        engine.deadlock_status(),
        DeadlockStatus {
            active: true,
            message: "Deadlock detectado!"
        }
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_single_waiting_process_is_not_deadlock() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);

    for _ in 0..6 {
        engine.tick();
        assert!(!engine.deadlock_status().active);
    }
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn test_offset_processes_never_wait_together() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);
    engine.tick();
    engine.create(ProcessKind::CpuBound);

    for _ in 0..9 {
        engine.tick();
        assert!(!engine.deadlock_status().active);
    }
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn test_recurring_deadlock_notifies_once() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);

    let mut active_ticks = 0;
    for _ in 0..30 {
        if engine.tick().deadlock.status.active {
            active_ticks += 1;
        }
    }

    assert_eq!(active_ticks, 10);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reset_rearms_notification() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);

    engine.tick();
    engine.tick();
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    engine.reset_deadlock_notification();
    assert!(!engine.deadlock_notified());

    // ready, running, then waiting again
    engine.tick();
    engine.tick();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    engine.tick();
    assert_eq!(fired.load(Ordering::SeqCst), 2);
    assert!(engine.deadlock_notified());
}

#[test]
fn test_stop_all_clears_status_but_not_latch() {
    let (mut engine, fired) = engine_with_counter();
    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);
    engine.tick();
    engine.tick();

    engine.stop_all();
    assert!(!engine.deadlock_status().active);
    assert!(engine.deadlock_notified());

    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);
    engine.tick();
    engine.tick();
    assert!(engine.deadlock_status().active);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_deadlock_event_published_once() {
    let (mut engine, _fired) = engine_with_counter();
    let mut rx = engine.subscribe();
    engine.create(ProcessKind::CpuBound);
    engine.create(ProcessKind::CpuBound);
    for _ in 0..6 {
        engine.tick();
    }

    let mut detected = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let EngineEvent::DeadlockDetected { waiting } = event {
            detected.push(waiting);
        }
    }
    assert_eq!(detected, vec![2]);
}
