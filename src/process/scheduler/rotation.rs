/*!
 * State Rotation
 *
 * The lockstep rule applied to every live process on each tick:
 *
 * | (state, phase)             | next               |
 * |----------------------------|--------------------|
 * | any state, phase set       | (waiting, clear)   |
 * | (waiting, clear)           | (ready, clear)     |
 * | (ready, clear)             | (running, set)     |
 *
 * A process therefore cycles running -> waiting -> ready -> running with a
 * period of exactly three ticks. There is no ready queue and no selection:
 * every process advances on every tick.
 */

use crate::process::types::{Process, ProcessState};

/// Advance one process by one rotation step, returning its previous state
pub fn rotate(process: &mut Process) -> ProcessState {
    let previous = process.state;

    if process.rotation_phase {
        process.state = ProcessState::Waiting;
        process.rotation_phase = false;
    } else {
        match process.state {
            ProcessState::Waiting => process.state = ProcessState::Ready,
            ProcessState::Ready => {
                process.state = ProcessState::Running;
                process.rotation_phase = true;
            }
            // Running always carries the phase flag; nothing to do otherwise
            ProcessState::Running => {}
        }
    }

    previous
}

/// Advance every process by one step; returns how many changed state
pub fn rotate_all(processes: &mut [Process]) -> usize {
    processes
        .iter_mut()
        .map(|process| rotate(process) != process.state)
        .filter(|changed| *changed)
        .count()
}
