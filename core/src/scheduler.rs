//! Escalation scheduler: runs the scanner on a fixed interval.
//!
//! The store is synchronous, so each sweep runs on tokio's blocking pool and
//! the loop awaits it before taking the next tick. Ticks missed while a
//! sweep is running are skipped, not queued.

use crate::escalation::{EscalationScanner, ScanOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

pub struct EscalationScheduler;

/// Handle to a running scheduler. Dropping it without `shutdown` leaves the
/// task running until the runtime stops.
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task:        JoinHandle<()>,
    completed:   Arc<AtomicU64>,
}

impl EscalationScheduler {
    /// Spawn the sweep loop on the current tokio runtime. The first sweep
    /// happens immediately.
    pub fn start(scanner: Arc<EscalationScanner>, period: Duration) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let completed = Arc::new(AtomicU64::new(0));
        let completed_in_task = completed.clone();

        log::info!("Escalation scheduler started (every {}s)", period.as_secs_f64());

        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        log::info!("Escalation scheduler received shutdown signal");
                        break;
                    }
                    _ = timer.tick() => {
                        let scanner = scanner.clone();
                        match tokio::task::spawn_blocking(move || scanner.run_once()).await {
                            Ok(Ok(ScanOutcome::Completed(report))) => {
                                completed_in_task.fetch_add(1, Ordering::Relaxed);
                                log::debug!(
                                    "Escalation tick: examined={} escalated={}",
                                    report.examined,
                                    report.escalated.len(),
                                );
                            }
                            Ok(Ok(ScanOutcome::Skipped)) => {}
                            Ok(Err(e)) => log::error!("Escalation scan failed: {e}"),
                            Err(e) => log::error!("Escalation scan task aborted: {e}"),
                        }
                    }
                }
            }
        });

        SchedulerHandle { shutdown_tx, task, completed }
    }
}

impl SchedulerHandle {
    /// Sweeps that ran to completion so far.
    pub fn completed_scans(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Stop the loop and wait for an in-progress sweep to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            log::error!("Escalation scheduler task ended abnormally: {e}");
        }
    }
}
