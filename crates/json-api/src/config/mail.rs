//! Mail Config

use clap::Args;
use titan_app::notifications::{
    DEFAULT_MAIL_API_URL, DEFAULT_MAIL_FROM, DEFAULT_SITE_URL, MailerConfig,
};

/// Receipt and account email delivery settings.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Base URL of the transactional mail API
    #[arg(long, env = "MAIL_API_URL", default_value = DEFAULT_MAIL_API_URL)]
    pub mail_api_url: String,

    /// Mail API key; emails are only logged when unset
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    pub mail_api_key: Option<String>,

    /// Sender address used on every email
    #[arg(long, env = "MAIL_FROM", default_value = DEFAULT_MAIL_FROM)]
    pub mail_from: String,

    /// Storefront URL linked from verification and reset emails
    #[arg(long, env = "SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: String,
}

impl From<&MailConfig> for MailerConfig {
    fn from(config: &MailConfig) -> Self {
        MailerConfig {
            api_url: config.mail_api_url.clone(),
            api_key: config
                .mail_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            from: config.mail_from.clone(),
            site_url: config.site_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> MailConfig {
        MailConfig {
            mail_api_url: DEFAULT_MAIL_API_URL.to_string(),
            mail_api_key: api_key.map(ToString::to_string),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            site_url: "https://titansupps.com".to_string(),
        }
    }

    #[test]
    fn blank_api_key_falls_back_to_log_only_delivery() {
        assert_eq!(MailerConfig::from(&config(Some("  "))).api_key, None);
    }

    #[test]
    fn site_url_is_carried_over() {
        assert_eq!(
            MailerConfig::from(&config(None)).site_url,
            "https://titansupps.com",
            "account emails must link to the configured storefront"
        );
    }
}
