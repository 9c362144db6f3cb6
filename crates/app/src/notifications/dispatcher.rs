//! Fire-and-forget receipt delivery.

use std::{error::Error as _, sync::Arc};

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::notifications::{Mailer, MailerError, Receipt};

/// Queues receipts for a background worker that renders and sends them.
///
/// Handing a receipt over never blocks and never fails the caller. Delivery
/// failures are logged and not retried.
#[derive(Debug, Clone)]
pub struct ReceiptDispatcher {
    sender: mpsc::UnboundedSender<Receipt>,
}

impl ReceiptDispatcher {
    /// Start the delivery worker. Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(mailer: Arc<dyn Mailer>, from: String) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Receipt>();

        tokio::spawn(async move {
            while let Some(receipt) = receiver.recv().await {
                deliver(mailer.as_ref(), &from, &receipt).await;
            }
        });

        Self { sender }
    }

    pub fn dispatch(&self, receipt: Receipt) {
        if let Err(rejected) = self.sender.send(receipt) {
            error!(
                order = %rejected.0.order,
                "receipt worker stopped, confirmation email dropped"
            );
        }
    }
}

async fn deliver(mailer: &dyn Mailer, from: &str, receipt: &Receipt) {
    let result = match receipt.to_mail(from) {
        Ok(mail) => mailer.send(&mail).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => info!(order = %receipt.order, "order receipt delivered"),
        Err(error @ MailerError::Template(_)) => error!(
            order = %receipt.order,
            error = %error,
            cause = ?error.source(),
            "failed to render order receipt"
        ),
        Err(error) => error!(
            order = %receipt.order,
            error = %error,
            "failed to send order receipt"
        ),
    }
}
