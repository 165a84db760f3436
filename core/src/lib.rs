//! civic-core: complaint lifecycle, SLA escalation and notification fan-out
//! for a municipal complaint tracker.
//!
//! Outer surfaces (HTTP, UI, login, file upload) call into the services
//! wired by [`engine::CivicEngine`].

pub mod analytics;
pub mod classifier;
pub mod clock;
pub mod comment;
pub mod complaint;
pub mod complaint_service;
pub mod config;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod event;
pub mod inbox;
pub mod notification;
pub mod priority;
pub mod push;
pub mod repository;
pub mod scheduler;
pub mod sentiment;
pub mod settings;
pub mod sla_policy;
pub mod status_service;
pub mod store;
pub mod transport;
pub mod types;
pub mod user;
