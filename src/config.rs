use std::env;

#[derive(Clone, Debug, PartialEq)]
pub enum EmailProviderKind {
    Resend,
    Console,
}

const DEFAULT_EMAIL_TIMEOUT_SECS: u64 = 10;

/// A zero timeout would fail every send, so it falls back to the default.
fn parse_timeout_secs(raw: Option<String>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|&secs: &u64| secs > 0)
        .unwrap_or(DEFAULT_EMAIL_TIMEOUT_SECS)
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub email_provider: EmailProviderKind,
    pub resend_api_key: String,
    pub resend_api_url: String,
    pub email_from: String,
    pub admin_email: String,
    pub business_email: String,
    pub test_email_to: Option<String>,
    pub email_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let resend_api_key = env::var("RESEND_API_KEY").unwrap_or_default();

        // Without a key there is nothing to talk to, so fall back to logging emails.
        let email_provider = match env::var("EMAIL_PROVIDER").ok().as_deref() {
            Some("resend") => EmailProviderKind::Resend,
            Some("console") => EmailProviderKind::Console,
            _ if !resend_api_key.is_empty() => EmailProviderKind::Resend,
            _ => EmailProviderKind::Console,
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "nextspin.db".to_string()),
            email_provider,
            resend_api_key,
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "NextSpin <onboarding@resend.dev>".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "acestudios.r@gmail.com".to_string()),
            business_email: env::var("BUSINESS_EMAIL")
                .unwrap_or_else(|_| "nextspinco@gmail.com".to_string()),
            test_email_to: env::var("TEST_EMAIL_TO").ok().filter(|v| !v.is_empty()),
            email_timeout_secs: parse_timeout_secs(env::var("EMAIL_TIMEOUT_SECS").ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_default() {
        assert_eq!(parse_timeout_secs(None), 10);
        assert_eq!(parse_timeout_secs(Some("soon".to_string())), 10);
    }

    #[test]
    fn test_timeout_zero_falls_back() {
        assert_eq!(parse_timeout_secs(Some("0".to_string())), 10);
    }

    #[test]
    fn test_timeout_custom() {
        assert_eq!(parse_timeout_secs(Some("3".to_string())), 3);
    }
}
