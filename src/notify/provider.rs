//! Notifier implementations

use async_trait::async_trait;
use serde::Serialize;

use super::{NotifyError, Notifier, ShareInvite};

/// Posts messages to an HTTP mail relay as JSON
pub struct HttpRelayNotifier {
    client: reqwest::Client,
    relay_url: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpRelayNotifier {
    pub fn new(relay_url: &str, api_key: Option<String>, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: relay_url.to_string(),
            api_key,
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for HttpRelayNotifier {
    async fn send(&self, invite: &ShareInvite) -> Result<(), NotifyError> {
        let message = RelayMessage {
            from: &self.from,
            to: &invite.to,
            subject: &invite.subject,
            text: &invite.body,
        };

        let mut request = self.client.post(&self.relay_url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Writes invites to the log instead of sending them
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, invite: &ShareInvite) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %invite.to,
            subject = %invite.subject,
            "Mail relay not configured; invite: {}",
            invite.body
        );
        Ok(())
    }
}
