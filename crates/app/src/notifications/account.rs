//! Account emails: verification and password reset codes.

use std::sync::Arc;

use askama::Template;
use tracing::info;

use crate::{
    domain::users::codes::CODE_TTL,
    notifications::{Mailer, MailerError, OutgoingMail},
};

/// Greeting used when an account has no usable name.
const FALLBACK_NAME: &str = "Athlete";

#[derive(Template)]
#[template(path = "email/verification_code.html")]
struct VerificationCodeHtml<'a> {
    name: &'a str,
    code: &'a str,
    minutes: i64,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/verification_code.txt")]
struct VerificationCodeText<'a> {
    name: &'a str,
    code: &'a str,
    minutes: i64,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    name: &'a str,
    code: &'a str,
    minutes: i64,
    action_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetText<'a> {
    name: &'a str,
    code: &'a str,
    minutes: i64,
    action_url: &'a str,
}

/// A mailbox and the name to greet it with.
#[derive(Debug, Clone, Copy)]
pub struct Recipient<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

impl Recipient<'_> {
    fn greeting(&self) -> &str {
        let name = self.name.trim();

        if name.is_empty() { FALLBACK_NAME } else { name }
    }
}

/// Sends account codes synchronously, so callers learn whether the mail went out.
#[derive(Clone)]
pub struct AccountMailer {
    mailer: Arc<dyn Mailer>,
    from: String,
    site_url: String,
}

impl std::fmt::Debug for AccountMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountMailer")
            .field("from", &self.from)
            .field("site_url", &self.site_url)
            .finish_non_exhaustive()
    }
}

impl AccountMailer {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, from: String, site_url: &str) -> Self {
        Self {
            mailer,
            from,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Email the code that confirms `to` owns its address.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    pub async fn send_verification_code(
        &self,
        to: Recipient<'_>,
        code: &str,
    ) -> Result<(), MailerError> {
        let mail = self.verification_code_mail(to, code)?;

        self.mailer.send(&mail).await?;

        info!(to = %to.email, "verification code sent");

        Ok(())
    }

    /// Email the code that authorises a password change for `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or delivery fails.
    pub async fn send_password_reset_code(
        &self,
        to: Recipient<'_>,
        code: &str,
    ) -> Result<(), MailerError> {
        let mail = self.password_reset_mail(to, code)?;

        self.mailer.send(&mail).await?;

        info!(to = %to.email, "password reset code sent");

        Ok(())
    }

    fn verification_code_mail(
        &self,
        to: Recipient<'_>,
        code: &str,
    ) -> Result<OutgoingMail, MailerError> {
        let name = to.greeting();
        let action_url = format!("{}/auth/verify", self.site_url);
        let minutes = CODE_TTL.as_mins();

        Ok(OutgoingMail {
            from: self.from.clone(),
            to: vec![to.email.to_string()],
            subject: format!("Your verification code: {code}"),
            text: VerificationCodeText {
                name,
                code,
                minutes,
                action_url: &action_url,
            }
            .render()?,
            html: VerificationCodeHtml {
                name,
                code,
                minutes,
                action_url: &action_url,
            }
            .render()?,
        })
    }

    fn password_reset_mail(
        &self,
        to: Recipient<'_>,
        code: &str,
    ) -> Result<OutgoingMail, MailerError> {
        let name = to.greeting();
        let action_url = format!("{}/auth/reset-password", self.site_url);
        let minutes = CODE_TTL.as_mins();

        Ok(OutgoingMail {
            from: self.from.clone(),
            to: vec![to.email.to_string()],
            subject: format!("Code to reset your password: {code}"),
            text: PasswordResetText {
                name,
                code,
                minutes,
                action_url: &action_url,
            }
            .render()?,
            html: PasswordResetHtml {
                name,
                code,
                minutes,
                action_url: &action_url,
            }
            .render()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::notifications::MockMailer;

    use super::*;

    const FROM: &str = "TitanSupps <noreply@titansupps.com>";

    fn account_mailer(mailer: MockMailer) -> AccountMailer {
        AccountMailer::new(Arc::new(mailer), FROM.to_string(), "https://titansupps.com/")
    }

    fn sam() -> Recipient<'static> {
        Recipient {
            name: "Sam <Lifter>",
            email: "sam@gmail.com",
        }
    }

    #[test]
    fn verification_mail_carries_code_and_link() -> TestResult {
        let mail = account_mailer(MockMailer::new()).verification_code_mail(sam(), "482916")?;

        assert_eq!(mail.subject, "Your verification code: 482916");
        assert_eq!(mail.to, vec!["sam@gmail.com".to_string()]);
        assert_eq!(mail.from, FROM);
        assert!(mail.text.contains("482916"));
        assert!(mail.text.contains("expires in 15 minutes"));
        assert!(mail.text.contains("https://titansupps.com/auth/verify"));
        assert!(mail.html.contains("482916"));
        assert!(!mail.html.contains("<Lifter>"));

        Ok(())
    }

    #[test]
    fn reset_mail_carries_code() -> TestResult {
        let mail = account_mailer(MockMailer::new()).password_reset_mail(sam(), "135790")?;

        assert_eq!(mail.subject, "Code to reset your password: 135790");
        assert!(mail.text.contains("135790"));
        assert!(mail.text.contains("https://titansupps.com/auth/reset-password"));

        Ok(())
    }

    #[test]
    fn blank_names_are_greeted_as_athlete() -> TestResult {
        let mail = account_mailer(MockMailer::new()).verification_code_mail(
            Recipient {
                name: "  ",
                email: "sam@gmail.com",
            },
            "482916",
        )?;

        assert!(mail.text.contains("Hi Athlete,"));

        Ok(())
    }

    #[tokio::test]
    async fn delivery_failures_reach_the_caller() {
        let mut mailer = MockMailer::new();

        mailer.expect_send().once().returning(|_| {
            Err(MailerError::Rejected {
                status: 422,
                body: "invalid recipient".to_string(),
            })
        });

        let result = account_mailer(mailer)
            .send_password_reset_code(sam(), "135790")
            .await;

        assert!(
            matches!(result, Err(MailerError::Rejected { status: 422, .. })),
            "expected the rejection, got {result:?}"
        );
    }
}
