//! Service wiring. The one place collaborators are plugged together.
//!
//! WIRING ORDER (leaves first):
//!   1. Store, clock, config
//!   2. Policies: sentiment scorer, image classifier
//!   3. Notification fan-out (inbox + push + email + SMS)
//!   4. Services: users, complaints, status, escalation, inbox, comments,
//!      settings, analytics
//!
//! Every service holds shared handles; the engine itself carries no state
//! beyond them.

use crate::{
    analytics::AnalyticsService,
    classifier::{ImageClassifier, KeywordClassifier},
    clock::{Clock, ManualClock},
    comment::CommentService,
    complaint_service::ComplaintService,
    config::CivicConfig,
    error::CivicResult,
    escalation::{EscalationScanner, ScanOutcome},
    inbox::InboxService,
    notification::NotificationService,
    push::{PushChannel, PushHub},
    scheduler::{EscalationScheduler, SchedulerHandle},
    sentiment::{LexiconScorer, SentimentScorer},
    settings::SettingsService,
    status_service::StatusService,
    store::CivicStore,
    transport::{EmailTransport, LogMailer, LogSms, SmsTransport},
    user::UserService,
};
use std::sync::Arc;
use std::time::Duration;

/// Outbound delivery channels.
#[derive(Clone)]
pub struct Transports {
    pub push:  Arc<dyn PushChannel>,
    pub email: Arc<dyn EmailTransport>,
    pub sms:   Arc<dyn SmsTransport>,
}

impl Transports {
    /// Push through `hub`; email and SMS go to the log.
    pub fn logging(config: &CivicConfig, hub: Arc<PushHub>) -> Self {
        Self {
            push: hub,
            email: Arc::new(LogMailer { from: config.notification.email_from.clone() }),
            sms: Arc::new(LogSms),
        }
    }
}

pub struct CivicEngine {
    pub config:     CivicConfig,
    pub store:      Arc<CivicStore>,
    pub clock:      Arc<dyn Clock>,
    pub notifier:   Arc<NotificationService>,
    pub scanner:    Arc<EscalationScanner>,
    pub users:      UserService,
    pub complaints: ComplaintService,
    pub status:     StatusService,
    pub inbox:      InboxService,
    pub comments:   CommentService,
    pub settings:   SettingsService,
    pub analytics:  AnalyticsService,
}

impl CivicEngine {
    /// Build a fully wired engine over an already-migrated store.
    pub fn build(
        store: Arc<CivicStore>,
        config: CivicConfig,
        clock: Arc<dyn Clock>,
        transports: Transports,
    ) -> Self {
        Self::build_with(
            store,
            config,
            clock,
            transports,
            Arc::new(LexiconScorer),
            Arc::new(KeywordClassifier),
        )
    }

    pub fn build_with(
        store: Arc<CivicStore>,
        config: CivicConfig,
        clock: Arc<dyn Clock>,
        transports: Transports,
        scorer: Arc<dyn SentimentScorer>,
        classifier: Arc<dyn ImageClassifier>,
    ) -> Self {
        let notifier = Arc::new(NotificationService::new(
            store.clone(),
            transports.push,
            transports.email,
            transports.sms,
            clock.clone(),
            config.notification.clone(),
        ));
        let scanner = Arc::new(EscalationScanner::new(
            store.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        ));

        Self {
            users: UserService::new(store.clone(), clock.clone()),
            complaints: ComplaintService::new(store.clone(), store.clone(), scorer, classifier, clock.clone()),
            status: StatusService::new(store.clone(), store.clone(), notifier.clone(), clock.clone()),
            inbox: InboxService::new(store.clone()),
            comments: CommentService::new(store.clone(), clock.clone()),
            settings: SettingsService::new(store.clone(), clock.clone()),
            analytics: AnalyticsService::new(store.clone()),
            notifier,
            scanner,
            store,
            clock,
            config,
        }
    }

    /// In-memory store, test config, caller-controlled clock and transports.
    pub fn build_test(clock: Arc<ManualClock>, transports: Transports) -> CivicResult<Self> {
        let store = CivicStore::in_memory()?;
        store.migrate()?;
        Ok(Self::build(
            Arc::new(store),
            CivicConfig::default_test(),
            clock,
            transports,
        ))
    }

    /// One escalation sweep, outside the schedule.
    pub fn run_scan(&self) -> CivicResult<ScanOutcome> {
        self.scanner.run_once()
    }

    /// Start periodic escalation on the current tokio runtime.
    /// Returns None when escalation is disabled in config.
    pub fn start_scheduler(&self) -> Option<SchedulerHandle> {
        if !self.config.escalation.enabled {
            log::info!("Escalation scheduler disabled by config");
            return None;
        }
        Some(EscalationScheduler::start(
            self.scanner.clone(),
            Duration::from_secs(self.config.escalation.interval_secs),
        ))
    }
}
