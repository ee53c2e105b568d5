/*!
 * SimuVOS - Demo Driver
 *
 * Runs the simulation engine headless:
 * - one process of each kind
 * - periodic rotation at the configured period
 * - deadlock notification logged once
 * - JSON report printed on exit
 *
 * Environment: SIMUVOS_* (see `SimulationConfig`), SIMUVOS_RUN_SECS (default 10),
 * RUST_LOG, SIMUVOS_TRACE_JSON.
 */

use simuvos_kernel::{
    format_elapsed, init_tracing, ConfigError, Engine, EngineEvent, KernelError, KernelResult,
    ProcessKind, SchedulerClock, SimulationConfig,
};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{info, warn};

const ENV_RUN_SECS: &str = "SIMUVOS_RUN_SECS";
const DEFAULT_RUN_SECS: u64 = 10;

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();
    run().await?;
    Ok(())
}

async fn run() -> KernelResult<()> {
    info!("SimuVOS starting...");

    let config = SimulationConfig::from_env()?;
    let run_secs = run_duration()?;
    info!(?config, run_secs, "Configuration loaded");

    let mut engine = Engine::from_config(&config)?;
    engine.on_first_deadlock_notified(|status| {
        warn!(alert = status.message, "Deadlock alert raised");
    });

    let mut events = engine.subscribe();
    let engine = engine.into_shared();

    {
        let mut engine = engine.lock();
        for kind in ProcessKind::ALL {
            let process = engine.create(kind);
            info!(
                pid = process.id,
                kind = kind.label(),
                memory = process.allocated_memory_bytes,
                threads = process.thread_count,
                "Process created"
            );
        }
    }

    let clock = SchedulerClock::spawn(engine.clone());
    let started = Instant::now();
    let deadline = tokio::time::sleep(Duration::from_secs(run_secs));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(deadline, ctrl_c);
    let mut seconds = tokio::time::interval_at(
        started + Duration::from_secs(1),
        Duration::from_secs(1),
    );

    info!("Simulation running - press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("Run time elapsed");
                break;
            }

            signal = &mut ctrl_c => {
                signal?;
                info!("Interrupted");
                break;
            }

            _ = seconds.tick() => {
                engine.lock().advance_elapsed(1);
            }

            event = events.recv() => {
                match event {
                    Ok(EngineEvent::Tick { tick, waiting, .. }) => {
                        let engine = engine.lock();
                        let status = engine.deadlock_status();
                        info!(tick, waiting, status = status.message, "Tick applied");
                        for process in engine.snapshot() {
                            info!(
                                pid = process.id,
                                state = process.state.label(),
                                free = !process.is_waiting(),
                                "{}",
                                process.thread_status()
                            );
                        }
                    }
                    Ok(other) => info!(event = ?other, "Engine event"),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event subscriber lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    clock.shutdown().await;

    let active = started.elapsed().as_secs();
    let report = engine.lock().report(active);
    info!(active_time = %format_elapsed(active), "Simulation finished");
    println!("{}", report.to_json_pretty()?);

    Ok(())
}

fn run_duration() -> Result<u64, KernelError> {
    match std::env::var(ENV_RUN_SECS) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                var: ENV_RUN_SECS.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        }),
        _ => Ok(DEFAULT_RUN_SECS),
    }
}
