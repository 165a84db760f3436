//! Shared harness for integration tests: manual clock, in-memory engine and
//! a recording outbox that stands in for push, email and SMS.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use civic_core::{
    clock::ManualClock,
    complaint::{Complaint, NewComplaint},
    engine::{CivicEngine, Transports},
    event::PushMessage,
    push::{PushChannel, PushOutcome},
    transport::{EmailTransport, SmsTransport, TransportError},
    types::{Actor, Role},
    user::{NewUser, User},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub to:      String,
    pub subject: String,
    pub body:    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentSms {
    pub to:   String,
    pub body: String,
}

/// Records every delivery attempt. Each channel can be switched to fail.
#[derive(Default)]
pub struct Outbox {
    pub emails: Mutex<Vec<SentEmail>>,
    pub sms:    Mutex<Vec<SentSms>>,
    pub pushes: Mutex<Vec<(String, PushMessage)>>,
    pub fail_email: AtomicBool,
    pub fail_sms:   AtomicBool,
    pub fail_push:  AtomicBool,
}

impl Outbox {
    pub fn emails(&self) -> Vec<SentEmail> {
        self.emails.lock().unwrap().clone()
    }

    pub fn sms(&self) -> Vec<SentSms> {
        self.sms.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<(String, PushMessage)> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn pushes_to(&self, user_id: &str) -> Vec<PushMessage> {
        self.pushes()
            .into_iter()
            .filter(|(to, _)| to == user_id)
            .map(|(_, m)| m)
            .collect()
    }
}

impl EmailTransport for Outbox {
    fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        self.emails.lock().unwrap().push(SentEmail {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        });
        if self.fail_email.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable { channel: "email", reason: "relay down".into() });
        }
        Ok(())
    }
}

impl SmsTransport for Outbox {
    fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError> {
        self.sms.lock().unwrap().push(SentSms { to: to.into(), body: body.into() });
        if self.fail_sms.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected {
                channel: "sms",
                to: to.into(),
                reason: "gateway refused".into(),
            });
        }
        Ok(())
    }
}

impl PushChannel for Outbox {
    fn push(&self, recipient: &str, message: &PushMessage) -> Result<PushOutcome, TransportError> {
        self.pushes.lock().unwrap().push((recipient.into(), message.clone()));
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable { channel: "push", reason: "hub offline".into() });
        }
        Ok(PushOutcome::Sent(1))
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub struct Harness {
    pub engine: CivicEngine,
    pub clock:  Arc<ManualClock>,
    pub outbox: Arc<Outbox>,
}

impl Harness {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let clock = Arc::new(ManualClock::new(t0()));
        let outbox = Arc::new(Outbox::default());
        let transports = Transports {
            push: outbox.clone(),
            email: outbox.clone(),
            sms: outbox.clone(),
        };
        let engine = CivicEngine::build_test(clock.clone(), transports).unwrap();
        Self { engine, clock, outbox }
    }

    pub fn register(&self, name: &str, role: Role) -> User {
        let slug = name.to_lowercase().replace(' ', ".");
        self.engine
            .users
            .register(NewUser {
                name: name.into(),
                email: format!("{slug}@example.org"),
                phone: Some(format!("+1555{:07}", slug.len())),
                role,
            })
            .unwrap()
    }

    pub fn citizen(&self, name: &str) -> (User, Actor) {
        let user = self.register(name, Role::User);
        let actor = Actor::citizen(user.id.clone());
        (user, actor)
    }

    pub fn admin(&self, name: &str) -> (User, Actor) {
        let user = self.register(name, Role::Admin);
        let actor = Actor::admin(user.id.clone());
        (user, actor)
    }

    pub fn file(&self, actor: &Actor, title: &str, description: &str, category: &str) -> Complaint {
        self.engine
            .complaints
            .create(
                actor,
                NewComplaint {
                    title: title.into(),
                    description: description.into(),
                    category: Some(category.into()),
                    ..NewComplaint::default()
                },
            )
            .unwrap()
    }
}
