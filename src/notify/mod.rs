//! Share invitation delivery
//!
//! Mail goes out through a [`Notifier`]. Delivery is best effort: the
//! [`ShareMailer`] spawns it in the background and only logs failures, so a
//! broken relay never fails the share that triggered it.

mod provider;

pub use provider::{HttpRelayNotifier, LogNotifier};

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

pub const INVITE_SUBJECT: &str = "You have been invited to view a PDF";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail relay unreachable: {0}")]
    Transport(String),

    #[error("Mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// One outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareInvite {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, invite: &ShareInvite) -> Result<(), NotifyError>;
}

/// Builds invite messages and dispatches them without blocking the caller
#[derive(Clone)]
pub struct ShareMailer {
    notifier: Arc<dyn Notifier>,
    public_base_url: String,
}

impl ShareMailer {
    pub fn new(notifier: Arc<dyn Notifier>, public_base_url: &str) -> Self {
        Self {
            notifier,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Viewer URL for a share token
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/shared/{}", self.public_base_url, token)
    }

    pub fn invite(&self, recipient: &str, token: &str) -> ShareInvite {
        ShareInvite {
            to: recipient.to_string(),
            subject: INVITE_SUBJECT.to_string(),
            body: format!(
                "Click the link to view the shared PDF: {}",
                self.share_url(token)
            ),
        }
    }

    /// Send one invite per recipient on a background task
    pub fn dispatch(&self, recipients: Vec<String>, token: &str) -> Option<JoinHandle<()>> {
        if recipients.is_empty() {
            return None;
        }

        let invites: Vec<ShareInvite> = recipients.iter().map(|r| self.invite(r, token)).collect();
        let notifier = self.notifier.clone();

        Some(tokio::spawn(async move {
            let results = join_all(invites.iter().map(|invite| notifier.send(invite))).await;

            for (invite, result) in invites.iter().zip(results) {
                match result {
                    Ok(()) => tracing::info!(recipient = %invite.to, "Share invite sent"),
                    Err(e) => tracing::warn!(recipient = %invite.to, "Share invite failed: {}", e),
                }
            }
        }))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::mpsc;

    /// Forwards every invite to a channel
    pub struct RecordingNotifier {
        tx: mpsc::UnboundedSender<ShareInvite>,
    }

    impl RecordingNotifier {
        pub fn new() -> (Self, mpsc::UnboundedReceiver<ShareInvite>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self { tx }, rx)
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, invite: &ShareInvite) -> Result<(), NotifyError> {
            let _ = self.tx.send(invite.clone());
            Ok(())
        }
    }

    /// Fails every delivery
    pub struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _invite: &ShareInvite) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("relay down".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FailingNotifier, RecordingNotifier};
    use super::*;

    #[test]
    fn test_invite_message() {
        let mailer = ShareMailer::new(Arc::new(LogNotifier), "http://app.test/");
        let invite = mailer.invite("b@x.com", "abc-1234");

        assert_eq!(invite.to, "b@x.com");
        assert_eq!(invite.subject, INVITE_SUBJECT);
        assert_eq!(
            invite.body,
            "Click the link to view the shared PDF: http://app.test/shared/abc-1234"
        );
    }

    #[tokio::test]
    async fn test_dispatch_sends_each_recipient() {
        let (notifier, mut rx) = RecordingNotifier::new();
        let mailer = ShareMailer::new(Arc::new(notifier), "http://app.test");

        let handle = mailer
            .dispatch(vec!["a@x.com".into(), "b@x.com".into()], "tok")
            .unwrap();
        handle.await.unwrap();

        let mut sent = vec![rx.recv().await.unwrap().to, rx.recv().await.unwrap().to];
        sent.sort();
        assert_eq!(sent, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let mailer = ShareMailer::new(Arc::new(FailingNotifier), "http://app.test");
        let handle = mailer.dispatch(vec!["a@x.com".into()], "tok").unwrap();
        assert!(handle.await.is_ok());
    }

    #[test]
    fn test_dispatch_nothing_for_no_recipients() {
        let mailer = ShareMailer::new(Arc::new(LogNotifier), "http://app.test");
        assert!(mailer.dispatch(Vec::new(), "tok").is_none());
    }
}
