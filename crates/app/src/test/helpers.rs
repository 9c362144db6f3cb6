//! Test Helpers

use std::sync::Arc;

use testresult::TestResult;
use tokio::sync::mpsc;

use crate::{
    domain::{
        checkout::data::{CheckoutLine, CheckoutRequest},
        products::{data::NewProduct, records::ProductUuid},
        users::{UsersService, data::NewUser, records::UserUuid},
    },
    notifications::{Mailer, MockMailer, OutgoingMail},
    test::TestContext,
};

pub(crate) fn new_product(name: &str, category: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        description: format!("{name} for serious lifters"),
        price,
        stock,
        category: category.to_string(),
        image_url: format!("https://cdn.titansupps.com/{category}.png"),
        featured: false,
    }
}

pub(crate) fn new_user(email: &str, email_verified: bool, is_admin: bool) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        name: "Test Lifter".to_string(),
        email: email.to_string(),
        email_verified,
        is_admin,
        password_hash: None,
    }
}

/// Create a customer who may check out.
pub(crate) async fn verified_user(ctx: &TestContext, email: &str) -> TestResult<UserUuid> {
    let user = ctx.users.create_user(new_user(email, true, false)).await?;

    Ok(user.uuid)
}

/// Checkout request shipping to `buyer@example.com`.
pub(crate) fn checkout_request(lines: &[(ProductUuid, i64)]) -> CheckoutRequest {
    CheckoutRequest {
        items: lines
            .iter()
            .map(|&(product_uuid, quantity)| CheckoutLine {
                product_uuid,
                quantity,
            })
            .collect(),
        customer_name: "Test Lifter".to_string(),
        customer_email: "buyer@example.com".to_string(),
    }
}

/// A mailer that accepts everything and hands each message to the returned receiver.
pub(crate) fn capturing_mailer() -> (Arc<dyn Mailer>, mpsc::UnboundedReceiver<OutgoingMail>) {
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let mut mailer = MockMailer::new();

    mailer.expect_send().returning(move |mail| {
        let _ = sent_tx.send(mail.clone());
        Ok(())
    });

    (Arc::new(mailer), sent_rx)
}

/// Account code mails end their subject with the code.
pub(crate) fn code_in(mail: &OutgoingMail) -> String {
    mail.subject
        .rsplit(' ')
        .next()
        .unwrap_or_default()
        .to_string()
}
