use async_trait::async_trait;

use crate::errors::InternalError;

/// Outbound email gateway. All domain sends go through `send_best_effort`:
/// a failed email is logged and never fails the primary operation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), InternalError>;
}

/// Default implementation that records the email through structured logging.
/// An SMTP-backed implementation plugs in behind the same trait.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), InternalError> {
        tracing::info!(to, subject, body, "email dispatched");
        Ok(())
    }
}

/// Fire-and-forget wrapper: failures are logged, never propagated.
pub async fn send_best_effort(mailer: &dyn Mailer, to: &str, subject: &str, body: &str) {
    if let Err(e) = mailer.send(to, subject, body).await {
        tracing::warn!(to, subject, "email send failed (non-critical): {e}");
    }
}
