//! Mail delivery errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail transport error")]
    Http(#[from] reqwest::Error),

    #[error("mail API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to render email template")]
    Template(#[from] askama::Error),
}
