use anyhow::Context;
use async_trait::async_trait;

use super::{EmailProvider, OutboundEmail};

pub struct ResendProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl ResendProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send_email(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .context("failed to call Resend API")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Resend API error ({}): {}", status, body);
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Resend response")?;
        tracing::debug!(to = %email.to, id = %data["id"], "email accepted by Resend");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let email = OutboundEmail {
            from: "NextSpin <onboarding@resend.dev>".to_string(),
            to: "a@x.com".to_string(),
            reply_to: None,
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["to"], "a@x.com");
        assert!(json.get("reply_to").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = ResendProvider::new("key".to_string(), "https://api.resend.com/".to_string());
        assert_eq!(provider.base_url, "https://api.resend.com");
    }
}
