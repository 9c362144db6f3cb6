//! Order and account notifications

mod account;
mod dispatcher;
mod errors;
mod mailer;
mod receipt;

pub use account::{AccountMailer, Recipient};
pub use dispatcher::ReceiptDispatcher;
pub use errors::MailerError;
pub use mailer::*;
pub use receipt::{Receipt, ReceiptLine, format_money};
