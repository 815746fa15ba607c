//! The scheduled sweep over all active simulations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::MissedTickBehavior;

use store::SimulationStore;

use crate::processor::{ProcessOutcome, SimulationProcessor};

/// Summary of one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SweepReport {
    /// True when the tick found the previous sweep still running and backed
    /// off without touching anything.
    pub skipped_overlap: bool,
    /// Simulations examined.
    pub processed: usize,
    /// Simulations that executed a trade.
    pub traded: usize,
    /// Simulations whose processing failed; each failure is logged and
    /// contained, never propagated.
    pub failed: usize,
}

/// Drives [`SimulationProcessor`] across every active simulation on a fixed
/// interval, one sweep at a time.
pub struct Sweeper {
    processor: Arc<SimulationProcessor>,
    simulations: Arc<dyn SimulationStore>,
    interval: Duration,
    /// Single-slot gate: a tick that cannot take the permit skips its sweep.
    gate: Semaphore,
}

impl Sweeper {
    pub fn new(
        processor: Arc<SimulationProcessor>,
        simulations: Arc<dyn SimulationStore>,
        interval: Duration,
    ) -> Self {
        Self {
            processor,
            simulations,
            interval,
            gate: Semaphore::new(1),
        }
    }

    /// The scheduler loop. Ticks that land while a sweep is running are
    /// skipped rather than queued, so sweeps never overlap or pile up.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = self.interval.as_secs(), "sweep scheduler started");

        loop {
            ticker.tick().await;
            let report = self.run_sweep().await;
            if !report.skipped_overlap {
                tracing::info!(
                    processed = report.processed,
                    traded = report.traded,
                    failed = report.failed,
                    "sweep complete"
                );
            }
        }
    }

    /// Runs one sweep now (also the force-sweep entry point). Failures are
    /// isolated per simulation; the sweep itself always completes.
    pub async fn run_sweep(&self) -> SweepReport {
        let Ok(_permit) = self.gate.try_acquire() else {
            tracing::warn!("previous sweep still running, skipping this tick");
            return SweepReport {
                skipped_overlap: true,
                ..SweepReport::default()
            };
        };

        let mut report = SweepReport::default();
        let active = match self.simulations.find_active().await {
            Ok(active) => active,
            Err(error) => {
                tracing::error!(%error, "failed to load active simulations");
                return report;
            }
        };

        for simulation in active {
            report.processed += 1;
            match self.processor.process_by_id(simulation.id).await {
                Ok(ProcessOutcome::Traded(_)) => report.traded += 1,
                Ok(_) => {}
                Err(error) => {
                    report.failed += 1;
                    tracing::error!(
                        simulation = %simulation.id,
                        %error,
                        "failed to process simulation, continuing sweep"
                    );
                }
            }
        }
        report
    }
}
