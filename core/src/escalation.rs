//! Escalation scanner: periodic SLA breach sweep.
//!
//! Each run:
//!   1. Load complaints that are unresolved and not yet escalated.
//!   2. For each one strictly past `created_at + expected_resolution_hours`:
//!      flag it, raise priority to at least `high`, save, and broadcast an
//!      alert to every administrator.
//!   3. Leave everything else untouched.
//!
//! A failure on one complaint is logged and the sweep moves on. The only
//! state carried between runs is the persisted `is_escalated` flag, so a
//! missed or failed run is picked up by the next one.

use crate::{
    clock::Clock,
    complaint::Complaint,
    error::CivicResult,
    event::LifecycleEvent,
    notification::{NotificationService, Recipient},
    repository::{ComplaintFilter, ComplaintRepository, UserDirectory},
    types::{ComplaintId, Role},
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanFailure {
    pub complaint_id: ComplaintId,
    pub error:        String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub started_at:  DateTime<Utc>,
    pub examined:    usize,
    pub escalated:   Vec<ComplaintId>,
    pub failed:      Vec<ScanFailure>,
    /// Individual admin deliveries attempted (one per admin per escalation).
    pub alerts_sent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    Completed(ScanReport),
    /// Another scan was still running; this one did nothing.
    Skipped,
}

pub struct EscalationScanner {
    complaints: Arc<dyn ComplaintRepository>,
    users:      Arc<dyn UserDirectory>,
    notifier:   Arc<NotificationService>,
    clock:      Arc<dyn Clock>,
    in_flight:  AtomicBool,
}

/// Clears the in-flight flag however the scan exits.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EscalationScanner {
    pub fn new(
        complaints: Arc<dyn ComplaintRepository>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            complaints,
            users,
            notifier,
            clock,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one sweep, unless one is already in progress.
    ///
    /// Errors only when the candidate query itself fails; per-complaint
    /// failures are collected in the report.
    pub fn run_once(&self) -> CivicResult<ScanOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Escalation scan skipped: previous scan still running");
            return Ok(ScanOutcome::Skipped);
        }
        let _guard = InFlight(&self.in_flight);

        self.sweep().map(ScanOutcome::Completed)
    }

    fn sweep(&self) -> CivicResult<ScanReport> {
        let now = self.clock.now();
        let candidates = self
            .complaints
            .find_complaints(&ComplaintFilter::escalation_candidates())?;
        log::debug!("Escalation scan at {now}: {} candidates", candidates.len());

        let mut report = ScanReport {
            started_at: now,
            examined: candidates.len(),
            escalated: Vec::new(),
            failed: Vec::new(),
            alerts_sent: 0,
        };
        let mut admins: Option<Vec<Recipient>> = None;

        for mut complaint in candidates {
            if !complaint.is_overdue(now) || !complaint.escalate(now) {
                continue;
            }
            let saved = match self.complaints.save_complaint(&complaint) {
                Ok(saved) => saved,
                Err(e) => {
                    log::error!("Escalation of complaint {} not saved: {e}", complaint.id);
                    report.failed.push(ScanFailure {
                        complaint_id: complaint.id.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            log::warn!(
                "Complaint {} breached its {}h SLA (deadline {}); escalated, priority now {}",
                saved.id,
                saved.expected_resolution_hours,
                saved.sla_deadline(),
                saved.priority,
            );
            report.escalated.push(saved.id.clone());

            let recipients = admins.get_or_insert_with(|| self.admin_recipients());
            report.alerts_sent += self.alert(recipients, &saved);
        }

        if !report.escalated.is_empty() || !report.failed.is_empty() {
            log::info!(
                "Escalation scan done: examined={} escalated={} failed={}",
                report.examined,
                report.escalated.len(),
                report.failed.len(),
            );
        }
        Ok(report)
    }

    fn admin_recipients(&self) -> Vec<Recipient> {
        match self.users.find_users_by_role(Role::Admin) {
            Ok(admins) => admins.iter().map(Recipient::from).collect(),
            Err(e) => {
                log::error!("Admin lookup failed, escalation alerts not sent: {e}");
                Vec::new()
            }
        }
    }

    fn alert(&self, admins: &[Recipient], complaint: &Complaint) -> usize {
        let event = LifecycleEvent::Escalation {
            complaint_id: complaint.id.clone(),
            title: complaint.title.clone(),
        };
        self.notifier.broadcast(admins, &event).len()
    }
}
