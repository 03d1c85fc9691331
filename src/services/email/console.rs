use async_trait::async_trait;

use super::{EmailProvider, OutboundEmail};

/// Logs emails instead of sending them. Used when no API key is configured.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

#[async_trait]
impl EmailProvider for ConsoleEmailProvider {
    async fn send_email(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        tracing::info!(
            from = %email.from,
            to = %email.to,
            reply_to = email.reply_to.as_deref().unwrap_or("-"),
            subject = %email.subject,
            "email (console provider, not sent)"
        );
        tracing::debug!(html = %email.html, "email body");
        Ok(())
    }
}
