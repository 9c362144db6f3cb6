//! Order receipt rendering.

use askama::Template;
use jiff::Timestamp;
use rusty_money::{Money, iso};

use crate::{
    domain::orders::records::OrderUuid,
    notifications::{MailerError, OutgoingMail},
};

/// A fully resolved order confirmation, ready to render without further lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order: OrderUuid,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<ReceiptLine>,
    pub total_amount: u64,
    pub order_date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

impl ReceiptLine {
    #[must_use]
    pub fn extension(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// One rendered line of the order table.
struct ReceiptRow<'a> {
    name: &'a str,
    quantity: u32,
    amount: String,
}

impl<'a> From<&'a ReceiptLine> for ReceiptRow<'a> {
    fn from(line: &'a ReceiptLine) -> Self {
        Self {
            name: &line.name,
            quantity: line.quantity,
            amount: format_money(line.extension()),
        }
    }
}

#[derive(Template)]
#[template(path = "email/receipt.html")]
struct ReceiptHtml<'a> {
    customer_name: &'a str,
    reference: &'a str,
    order_date: &'a str,
    rows: &'a [ReceiptRow<'a>],
    total: &'a str,
}

#[derive(Template)]
#[template(path = "email/receipt.txt")]
struct ReceiptText<'a> {
    customer_name: &'a str,
    reference: &'a str,
    order_date: &'a str,
    rows: &'a [ReceiptRow<'a>],
    total: &'a str,
}

impl Receipt {
    /// Short order number shown to customers: the last eight hex digits of the
    /// order id, upper-cased.
    #[must_use]
    pub fn reference(&self) -> String {
        let simple = self.order.as_uuid().simple().to_string();

        simple[simple.len() - 8..].to_ascii_uppercase()
    }

    #[must_use]
    pub fn subject(&self) -> String {
        format!("Order Confirmation #{}", self.reference())
    }

    /// Render the confirmation email sent to the customer.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Template`] when a body fails to render.
    pub fn to_mail(&self, from: &str) -> Result<OutgoingMail, MailerError> {
        let reference = self.reference();
        let order_date = self.order_date.strftime("%Y-%m-%d").to_string();
        let total = format_money(self.total_amount);
        let rows: Vec<ReceiptRow<'_>> = self.items.iter().map(ReceiptRow::from).collect();

        let html = ReceiptHtml {
            customer_name: &self.customer_name,
            reference: &reference,
            order_date: &order_date,
            rows: &rows,
            total: &total,
        }
        .render()?;

        let text = ReceiptText {
            customer_name: &self.customer_name,
            reference: &reference,
            order_date: &order_date,
            rows: &rows,
            total: &total,
        }
        .render()?;

        Ok(OutgoingMail {
            from: from.to_string(),
            to: vec![self.customer_email.clone()],
            subject: self.subject(),
            text,
            html,
        })
    }
}

/// Render minor units as US dollars, e.g. `3000` as `$30.00`.
#[must_use]
pub fn format_money(minor: u64) -> String {
    match i64::try_from(minor) {
        Ok(minor) => Money::from_minor(minor, iso::USD).to_string(),
        Err(_) => format!("${}.{:02}", minor / 100, minor % 100),
    }
}
