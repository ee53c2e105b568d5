/*!
 * Process Report
 * Read-only report data for external report generators
 *
 * Layout and document formatting belong to the generator; this module only
 * gathers the rows and totals.
 */

use crate::core::types::{format_elapsed, Bytes, IntervalMs, Pid, ThreadCount};
use crate::process::registry::ProcessRegistry;
use crate::process::types::Process;
use serde::Serialize;

pub const REPORT_TITLE: &str = "Relatório de Processos";

/// Column headers in row field order
pub const REPORT_COLUMNS: [&str; 7] = [
    "ID",
    "Tipo",
    "Estado",
    "Tempo Total (s)",
    "Fatia de Tempo (ms)",
    "Threads",
    "Memória (B)",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub id: Pid,
    pub kind: &'static str,
    pub state: &'static str,
    pub elapsed_secs: u64,
    pub time_slice_ms: IntervalMs,
    pub threads: ThreadCount,
    pub memory_bytes: Bytes,
}

impl From<&Process> for ReportRow {
    fn from(process: &Process) -> Self {
        Self {
            id: process.id,
            kind: process.kind.label(),
            state: process.state.label(),
            elapsed_secs: process.elapsed_secs,
            time_slice_ms: process.creation_time_slice_ms,
            threads: process.thread_count,
            memory_bytes: process.allocated_memory_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub title: &'static str,
    pub total_created: u64,
    pub total_allocated_memory: Bytes,
    /// Active time of the simulation as `m:ss`
    pub active_time: String,
    pub columns: [&'static str; 7],
    pub rows: Vec<ReportRow>,
}

impl ProcessReport {
    #[must_use]
    pub fn from_registry(registry: &ProcessRegistry, active_elapsed_secs: u64) -> Self {
        Self {
            title: REPORT_TITLE,
            total_created: registry.total_created(),
            total_allocated_memory: registry.total_allocated_memory(),
            active_time: format_elapsed(active_elapsed_secs),
            columns: REPORT_COLUMNS,
            rows: registry.iter().map(ReportRow::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
