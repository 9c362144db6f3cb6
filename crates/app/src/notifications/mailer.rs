//! Mail transports.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::notifications::{AccountMailer, MailerError};

pub const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_MAIL_FROM: &str = "TitanSupps <noreply@titansupps.com>";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Mail delivery settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Base URL of the transactional mail API.
    pub api_url: String,

    /// API key; without one mail is only logged.
    pub api_key: Option<String>,

    /// Sender address, e.g. `"TitanSupps <noreply@titansupps.com>"`.
    pub from: String,

    /// Storefront URL that account emails link back to.
    pub site_url: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_MAIL_API_URL.to_string(),
            api_key: None,
            from: DEFAULT_MAIL_FROM.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl MailerConfig {
    /// Build the transport this configuration describes.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Mailer> {
        match &self.api_key {
            Some(api_key) if !api_key.trim().is_empty() => {
                Arc::new(HttpMailer::new(&self.api_url, api_key))
            }
            _ => Arc::new(LogMailer),
        }
    }

    /// Account-code sender over `mailer`, using this configuration's sender and site.
    #[must_use]
    pub fn account_mailer(&self, mailer: Arc<dyn Mailer>) -> AccountMailer {
        AccountMailer::new(mailer, self.from.clone(), &self.site_url)
    }
}

/// A rendered message with plain text and HTML alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError>;
}

/// Delivers mail through a Resend-compatible JSON API (`POST {api_url}/emails`).
#[derive(Debug, Clone)]
pub struct HttpMailer {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl HttpMailer {
    #[must_use]
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/emails", api_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(to = ?mail.to, subject = %mail.subject, "email sent");

        Ok(())
    }
}

/// Logs mail instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailerError> {
        info!(
            to = ?mail.to,
            subject = %mail.subject,
            "mail API key not configured, email not sent"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_mailer_targets_emails_endpoint() {
        let mailer = HttpMailer::new("https://api.resend.com/", "re_test");

        assert_eq!(mailer.endpoint, "https://api.resend.com/emails");
    }

    #[test]
    fn outgoing_mail_serializes_as_api_payload() -> Result<(), serde_json::Error> {
        let mail = OutgoingMail {
            from: DEFAULT_MAIL_FROM.to_string(),
            to: vec!["sam@example.com".to_string()],
            subject: "Order Confirmation #FFEE1234".to_string(),
            text: "text".to_string(),
            html: "<p>html</p>".to_string(),
        };

        let payload = serde_json::to_value(&mail)?;

        assert_eq!(payload["to"][0], "sam@example.com");
        assert_eq!(payload["from"], DEFAULT_MAIL_FROM);
        assert_eq!(payload["subject"], "Order Confirmation #FFEE1234");

        Ok(())
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() -> Result<(), MailerError> {
        let mail = OutgoingMail {
            from: DEFAULT_MAIL_FROM.to_string(),
            to: vec!["sam@example.com".to_string()],
            subject: "subject".to_string(),
            text: String::new(),
            html: String::new(),
        };

        LogMailer.send(&mail).await
    }
}
