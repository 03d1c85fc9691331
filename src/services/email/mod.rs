pub mod console;
pub mod resend;

use async_trait::async_trait;
use serde::Serialize;

/// A rendered email, in the shape the provider API accepts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_email(&self, email: &OutboundEmail) -> anyhow::Result<()>;
}
