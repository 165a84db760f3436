//! Outbound email/SMS transports.
//!
//! Both are independent, fallible side effects. The log-backed
//! implementations stand in until a real provider is wired.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("{channel} transport rejected message to {to}: {reason}")]
    Rejected { channel: &'static str, to: String, reason: String },

    #[error("{channel} transport unavailable: {reason}")]
    Unavailable { channel: &'static str, reason: String },
}

pub trait EmailTransport: Send + Sync {
    fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}

pub trait SmsTransport: Send + Sync {
    fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError>;
}

/// Writes outgoing email to the log instead of an SMTP relay.
#[derive(Debug, Clone)]
pub struct LogMailer {
    pub from: String,
}

impl EmailTransport for LogMailer {
    fn send_email(&self, to: &str, subject: &str, _body: &str) -> Result<(), TransportError> {
        log::info!("[email] from={} to={to} subject={subject:?}", self.from);
        Ok(())
    }
}

/// Writes outgoing SMS to the log instead of a gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSms;

impl SmsTransport for LogSms {
    fn send_sms(&self, to: &str, body: &str) -> Result<(), TransportError> {
        log::info!("[sms] to={to} body={body:?}");
        Ok(())
    }
}
