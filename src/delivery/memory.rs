// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory delivery backend.
//!
//! Keeps every delivered message instead of sending it. Can be told to fail
//! with a given kind, or to stall, so the failure paths of the pipeline can be
//! exercised without a mail server.

use super::{DeliveryError, DeliveryErrorKind, DeliveryReceipt, MailTransport};
use crate::message::OutboundMessage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct MemoryMailer {
    sender: String,
    failure: Option<(DeliveryErrorKind, String)>,
    stall: Option<Duration>,
    attempts: AtomicUsize,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl MemoryMailer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            failure: None,
            stall: None,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Fail every send with `kind`, carrying `detail` as the internal cause.
    pub fn fail_with(mut self, kind: DeliveryErrorKind, detail: impl Into<String>) -> Self {
        self.failure = Some((kind, detail.into()));
        self
    }

    /// Wait this long before completing each send.
    pub fn stall_for(mut self, delay: Duration) -> Self {
        self.stall = Some(delay);
        self
    }

    /// Messages delivered so far.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Number of send calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for MemoryMailer {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }

        if let Some((kind, detail)) = &self.failure {
            return Err(DeliveryError::new(*kind, detail.clone()));
        }

        self.sent.lock().await.push(message.clone());
        Ok(DeliveryReceipt {
            id: Uuid::new_v4().to_string(),
        })
    }
}
