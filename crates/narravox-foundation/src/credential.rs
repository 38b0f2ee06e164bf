//! Credential-provider abstraction for the external speech service.
//!
//! The original bridge-backed authentication state was polled on a timer;
//! here it is an injected provider with an explicit status query plus an
//! optimistic-then-reconciled connection gate.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Source of API credentials for the synthesis backend.
///
/// `request_credential` may open an external account-selection flow; it
/// returns once the flow has been triggered, not once a credential exists.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a usable credential is currently available.
    fn has_credential(&self) -> bool;

    /// Trigger the external credential-selection flow.
    async fn request_credential(&self);
}

/// Connection state as tracked by the [`CredentialGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Disconnected,
    /// A selection flow has been triggered but not yet confirmed.
    Pending,
    Connected,
}

/// Optimistic connection tracker over a [`CredentialProvider`].
///
/// `connect` assumes success immediately after triggering the selection
/// flow; the next `reconcile` corrects the status from a confirmed read.
/// This mirrors the external flow's inability to report completion directly.
pub struct CredentialGate {
    provider: Arc<dyn CredentialProvider>,
    status: RwLock<CredentialStatus>,
}

impl CredentialGate {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        let status = if provider.has_credential() {
            CredentialStatus::Connected
        } else {
            CredentialStatus::Disconnected
        };
        Self {
            provider,
            status: RwLock::new(status),
        }
    }

    pub fn status(&self) -> CredentialStatus {
        *self.status.read()
    }

    /// Trigger the selection flow and optimistically mark the gate connected.
    pub async fn connect(&self) {
        *self.status.write() = CredentialStatus::Pending;
        self.provider.request_credential().await;
        tracing::info!("credential flow triggered, assuming connected until reconciled");
        *self.status.write() = CredentialStatus::Connected;
    }

    /// Correct the status from a confirmed provider read.
    pub fn reconcile(&self) -> CredentialStatus {
        let confirmed = if self.provider.has_credential() {
            CredentialStatus::Connected
        } else {
            CredentialStatus::Disconnected
        };
        let mut status = self.status.write();
        if *status != confirmed {
            tracing::debug!(?confirmed, previous = ?*status, "credential status reconciled");
            *status = confirmed;
        }
        confirmed
    }

    pub fn provider(&self) -> Arc<dyn CredentialProvider> {
        Arc::clone(&self.provider)
    }
}
