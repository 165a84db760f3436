//! Real-time push hub: per-user subscriber channels.
//!
//! A user may hold several live connections (tabs, devices). A push goes to
//! every live one; closed receivers are pruned on the way.

use crate::{event::PushMessage, transport::TransportError, types::UserId};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Outcome of a push attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Reached this many live connections.
    Sent(usize),
    NotConnected,
}

pub trait PushChannel: Send + Sync {
    fn push(&self, recipient: &str, message: &PushMessage) -> Result<PushOutcome, TransportError>;
}

#[derive(Debug, Default)]
pub struct PushHub {
    rooms: Mutex<HashMap<UserId, Vec<mpsc::UnboundedSender<PushMessage>>>>,
}

impl PushHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `user_id`'s room. Dropping the receiver leaves it.
    pub fn subscribe(&self, user_id: &str) -> mpsc::UnboundedReceiver<PushMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.rooms
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(user_id.to_string())
            .or_default()
            .push(tx);
        log::debug!("push: {user_id} joined");
        rx
    }

    pub fn connection_count(&self, user_id: &str) -> usize {
        self.rooms
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(user_id)
            .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }
}

impl PushChannel for PushHub {
    fn push(&self, recipient: &str, message: &PushMessage) -> Result<PushOutcome, TransportError> {
        let mut rooms = self.rooms.lock().map_err(|_| TransportError::Unavailable {
            channel: "push",
            reason: "subscriber table lock poisoned".into(),
        })?;
        let Some(senders) = rooms.get_mut(recipient) else {
            return Ok(PushOutcome::NotConnected);
        };

        senders.retain(|tx| tx.send(message.clone()).is_ok());
        let sent = senders.len();
        if sent == 0 {
            rooms.remove(recipient);
            return Ok(PushOutcome::NotConnected);
        }
        Ok(PushOutcome::Sent(sent))
    }
}
