/*!
 * Process Types
 * Common types for the simulated process lifecycle
 */

use crate::core::types::{Bytes, IntervalMs, Pid, ThreadCount};
use crate::process::resources::Allocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Process state
///
/// The simulation only knows three states; there is no creating or
/// terminated state because removal drops the entity outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Process is ready to run
    Ready,
    /// Process is waiting (blocked)
    Waiting,
    /// Process is currently running
    Running,
}

impl ProcessState {
    /// Label shown to students
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ProcessState::Ready => "pronto",
            ProcessState::Waiting => "em espera",
            ProcessState::Running => "em execução",
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_waiting(self) -> bool {
        matches!(self, ProcessState::Waiting)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workload category of a simulated process
///
/// The kind is descriptive only; it does not influence rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessKind {
    #[default]
    CpuBound,
    IoBound,
    IoBoundTape,
    IoBoundTerminal,
    CpuAndIoBoundDisk,
    CpuAndIoBoundTape,
}

impl ProcessKind {
    pub const ALL: [ProcessKind; 6] = [
        ProcessKind::CpuBound,
        ProcessKind::IoBound,
        ProcessKind::IoBoundTape,
        ProcessKind::IoBoundTerminal,
        ProcessKind::CpuAndIoBoundDisk,
        ProcessKind::CpuAndIoBoundTape,
    ];

    /// Stable kebab-case identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProcessKind::CpuBound => "cpu-bound",
            ProcessKind::IoBound => "io-bound",
            ProcessKind::IoBoundTape => "io-bound-tape",
            ProcessKind::IoBoundTerminal => "io-bound-terminal",
            ProcessKind::CpuAndIoBoundDisk => "cpu-and-io-bound-disk",
            ProcessKind::CpuAndIoBoundTape => "cpu-and-io-bound-tape",
        }
    }

    /// Label used by the classroom front-end and in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ProcessKind::CpuBound => "cpu-bound",
            ProcessKind::IoBound => "i/o-bound",
            ProcessKind::IoBoundTape => "i/o-bound(fita)",
            ProcessKind::IoBoundTerminal => "i/o-bound(terminal)",
            ProcessKind::CpuAndIoBoundDisk => "cpu e i/o-bound(disco)",
            ProcessKind::CpuAndIoBoundTape => "cpu e i/o-bound(fita)",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown process kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ProcessKind {
    type Err = UnknownKind;

    /// Accepts either the kebab-case identifier or the front-end label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ProcessKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle || kind.label() == needle)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Simulated process entity
///
/// Instances handed out by the engine are copies; the registry owns the
/// live entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub id: Pid,
    pub kind: ProcessKind,
    pub state: ProcessState,
    /// Distinguishes `running` from `ready, about to run`
    #[serde(skip)]
    pub(crate) rotation_phase: bool,
    /// Seconds counted by the external timer display
    pub elapsed_secs: u64,
    /// Global tick period at creation time, display only
    pub creation_time_slice_ms: IntervalMs,
    pub allocated_memory_bytes: Bytes,
    pub thread_count: ThreadCount,
}

impl Process {
    /// New process in `ready` with the rotation phase cleared
    #[must_use]
    pub(crate) fn new(
        id: Pid,
        kind: ProcessKind,
        current_interval_ms: IntervalMs,
        allocation: Allocation,
    ) -> Self {
        Self {
            id,
            kind,
            state: ProcessState::Ready,
            rotation_phase: false,
            elapsed_secs: 0,
            creation_time_slice_ms: current_interval_ms,
            allocated_memory_bytes: allocation.memory_bytes(),
            thread_count: allocation.thread_count(),
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.state.is_waiting()
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, ProcessState::Running)
    }

    /// Sentence describing the process threads in its current state
    #[must_use]
    pub fn thread_status(&self) -> String {
        let n = self.thread_count;
        match self.state {
            ProcessState::Ready => {
                format!("Processo está pronto com {n} threads prontas, aguardando execução.")
            }
            ProcessState::Waiting => format!(
                "Processo está esperando (bloqueado) com {n} threads prontas, sem execução."
            ),
            ProcessState::Running => format!("Processo está em execução com {n} threads."),
        }
    }
}
