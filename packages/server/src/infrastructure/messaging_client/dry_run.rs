//! MessagingClient that never leaves the process.
//!
//! Becomes ready as soon as it is initialized and logs every message instead of
//! delivering it. Handy for local runs and for smoke-testing the gateway.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatId, ClientEvent, EventSender, MessagingClient, MessagingError};

/// Message recorded by [`DryRunClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
}

pub struct DryRunClient {
    events: EventSender,
    initialized: AtomicBool,
    sent: Mutex<Vec<SentMessage>>,
}

impl DryRunClient {
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            initialized: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages "sent" so far, oldest first
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    fn emit(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("No listener for dry-run client events");
        }
    }
}

#[async_trait]
impl MessagingClient for DryRunClient {
    async fn initialize(&self) -> Result<(), MessagingError> {
        self.initialized.store(true, Ordering::SeqCst);
        tracing::warn!("Dry-run messaging client in use: messages will only be logged");
        self.emit(ClientEvent::Authenticated);
        self.emit(ClientEvent::Ready);
        Ok(())
    }

    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<(), MessagingError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(MessagingError::NotInitialized);
        }
        tracing::info!("[dry-run] message to '{}':\n{}", chat_id, text);
        self.sent.lock().await.push(SentMessage {
            chat_id: chat_id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn destroy(&self) -> Result<(), MessagingError> {
        self.initialized.store(false, Ordering::SeqCst);
        Ok(())
    }
}
