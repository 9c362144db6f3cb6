//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument, warn};

use crate::{
    database::Db,
    domain::{
        checkout::{
            assembler::{AssembledOrder, assemble, validate_request},
            data::CheckoutRequest,
            errors::CheckoutError,
            ledger::PgStockLedger,
        },
        orders::{records::OrderUuid, repository::PgOrdersRepository},
        products::records::ProductUuid,
        users::{UsersService, records::UserUuid},
    },
    notifications::{Receipt, ReceiptDispatcher, ReceiptLine},
};

/// Checkout orchestrator.
///
/// Identity and request shape are checked before any product is read. The
/// snapshot, order insert and stock decrements share one transaction; the receipt
/// is queued only after it commits.
#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    users: Arc<dyn UsersService>,
    receipts: ReceiptDispatcher,
    orders: PgOrdersRepository,
    ledger: PgStockLedger,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, users: Arc<dyn UsersService>, receipts: ReceiptDispatcher) -> Self {
        Self {
            db,
            users,
            receipts,
            orders: PgOrdersRepository::new(),
            ledger: PgStockLedger::new(),
        }
    }

    async fn commit_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        request: &CheckoutRequest,
    ) -> Result<(AssembledOrder, Timestamp), CheckoutError> {
        let mut referenced: Vec<ProductUuid> = request
            .items
            .iter()
            .map(|line| line.product_uuid)
            .collect();

        referenced.sort_unstable();
        referenced.dedup();

        let snapshot = self.ledger.snapshot(tx, &referenced).await?;

        let assembled = assemble(request, &snapshot, user, OrderUuid::new())?;

        let created_at = self.orders.create_order(tx, &assembled.order).await?;

        for reservation in &assembled.reservations {
            let remaining = self
                .ledger
                .decrement(tx, reservation.product, reservation.quantity)
                .await?;

            if remaining.is_some() {
                continue;
            }

            let fresh = self
                .ledger
                .check_availability(tx, reservation.product)
                .await?;

            return Err(match fresh {
                Some(product) if product.is_active => CheckoutError::InsufficientStock {
                    product: product.uuid,
                    name: product.name,
                    requested: reservation.quantity,
                    available: product.stock,
                },
                _ => CheckoutError::ProductNotFound(reservation.product),
            });
        }

        Ok((assembled, created_at))
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn authorize(&self, user: Option<UserUuid>) -> Result<UserUuid, CheckoutError> {
        let user = user.ok_or(CheckoutError::Unauthorized)?;

        let identity = self
            .users
            .identify(user)
            .await
            .map_err(CheckoutError::Identity)?
            .ok_or(CheckoutError::Unauthorized)?;

        if !identity.may_purchase() {
            return Err(CheckoutError::EmailNotVerified);
        }

        Ok(user)
    }

    #[instrument(
        name = "checkout",
        skip(self, request),
        fields(user = ?user, lines = request.items.len()),
        err
    )]
    async fn checkout(
        &self,
        user: Option<UserUuid>,
        request: CheckoutRequest,
    ) -> Result<OrderUuid, CheckoutError> {
        info!(state = "started");

        let user = self.authorize(user).await?;

        validate_request(&request)?;

        info!(state = "validating");

        let mut tx = self.db.begin_transaction().await?;

        let (assembled, created_at) = match self.commit_order(&mut tx, user, &request).await {
            Ok(committed) => committed,
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "explicit rollback failed");
                }

                warn!(state = "rolled_back", reason = error.kind());

                return Err(error);
            }
        };

        info!(state = "committing", order = %assembled.order.uuid);

        tx.commit().await?;

        let order = assembled.order;

        info!(
            state = "committed",
            order = %order.uuid,
            total_amount = order.total_amount
        );

        self.receipts.dispatch(Receipt {
            order: order.uuid,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            items: order
                .items
                .into_iter()
                .map(|item| ReceiptLine {
                    name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
            total_amount: order.total_amount,
            order_date: created_at,
        });

        Ok(order.uuid)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Resolve the buyer: signed in, known, and verified unless an admin.
    ///
    /// [`CheckoutService::checkout`] runs this first; callers that cannot build
    /// a request still use it so identity errors take precedence.
    async fn authorize(&self, user: Option<UserUuid>) -> Result<UserUuid, CheckoutError>;

    /// Purchase the requested products for `user`.
    ///
    /// On success the order, its items and the stock decrements are committed
    /// together and a receipt is queued for delivery. On any error nothing is
    /// written.
    async fn checkout(
        &self,
        user: Option<UserUuid>,
        request: CheckoutRequest,
    ) -> Result<OrderUuid, CheckoutError>;
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use testresult::TestResult;
    use tokio::{sync::mpsc, time::timeout};

    use crate::{
        domain::{
            checkout::errors::InvalidCheckout,
            orders::OrdersService,
            products::{ProductsService, data::ProductUpdate},
        },
        notifications::{MailerError, MockMailer, OutgoingMail},
        test::{
            TestContext,
            helpers::{checkout_request, new_product, new_user, verified_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn worked_example_second_purchase_hits_insufficient_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let product = ctx
            .products
            .create_product(new_product("Titan Whey", "protein", 1_000, 5))
            .await?;

        let order = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(product.uuid, 3)]))
            .await?;

        let placed = ctx.orders.get_order(buyer, order).await?;

        assert_eq!(placed.total_amount, 3_000);
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].quantity, 3);
        assert_eq!(placed.items[0].unit_price, 1_000);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 2);

        let result = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(product.uuid, 3)]))
            .await;

        assert!(
            matches!(
                &result,
                Err(CheckoutError::InsufficientStock { available: 2, .. })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        let message = result.err().map(|error| error.to_string());

        assert_eq!(
            message.as_deref(),
            Some("Insufficient stock for \"Titan Whey\". Available: 2")
        );
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 2);
        assert_eq!(ctx.orders.list_orders(buyer).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_line_leaves_every_product_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let plenty = ctx
            .products
            .create_product(new_product("Creatine", "creatine", 2_000, 50))
            .await?;

        let scarce = ctx
            .products
            .create_product(new_product("Limited Edition", "protein", 5_000, 1))
            .await?;

        let result = ctx
            .checkout
            .checkout(
                Some(buyer),
                checkout_request(&[(plenty.uuid, 10), (scarce.uuid, 2)]),
            )
            .await;

        assert!(
            matches!(result, Err(CheckoutError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(ctx.products.get_product(plenty.uuid).await?.stock, 50);
        assert_eq!(ctx.products.get_product(scarce.uuid).await?.stock, 1);
        assert!(ctx.orders.list_orders(buyer).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_for_the_last_units_admit_exactly_one() -> TestResult {
        let ctx = TestContext::new().await;
        let first = verified_user(&ctx, "first@example.com").await?;
        let second = verified_user(&ctx, "second@example.com").await?;

        let product = ctx
            .products
            .create_product(new_product("Titan Whey", "protein", 1_000, 2))
            .await?;

        let (a, b) = tokio::join!(
            ctx.checkout
                .checkout(Some(first), checkout_request(&[(product.uuid, 2)])),
            ctx.checkout
                .checkout(Some(second), checkout_request(&[(product.uuid, 2)])),
        );

        let successes = [a.is_ok(), b.is_ok()].into_iter().filter(|ok| *ok).count();

        assert_eq!(successes, 1, "results: {a:?} / {b:?}");

        let failure = if a.is_err() { a.err() } else { b.err() };

        assert!(
            matches!(
                failure,
                Some(CheckoutError::InsufficientStock { available: 0, .. })
            ),
            "expected InsufficientStock, got {failure:?}"
        );
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 0);
        assert_eq!(ctx.orders.store_stats().await?.total_orders, 1);

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_checkout_is_unauthorized() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let result = ctx
            .checkout
            .checkout(None, checkout_request(&[(product.uuid, 1)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::Unauthorized)),
            "expected Unauthorized, got {result:?}"
        );

        let unknown = ctx
            .checkout
            .checkout(Some(UserUuid::new()), checkout_request(&[(product.uuid, 1)]))
            .await;

        assert!(
            matches!(unknown, Err(CheckoutError::Unauthorized)),
            "expected Unauthorized, got {unknown:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unverified_customer_is_rejected_before_stock_changes() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .create_user(new_user("new@example.com", false, false))
            .await?;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let result = ctx
            .checkout
            .checkout(Some(user.uuid), checkout_request(&[(product.uuid, 1)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::EmailNotVerified)),
            "expected EmailNotVerified, got {result:?}"
        );
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn identity_errors_outrank_bad_quantities() -> TestResult {
        let ctx = TestContext::new().await;

        let unverified = ctx
            .users
            .create_user(new_user("new@example.com", false, false))
            .await?;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let anonymous = ctx
            .checkout
            .checkout(None, checkout_request(&[(product.uuid, 0)]))
            .await;

        assert!(
            matches!(anonymous, Err(CheckoutError::Unauthorized)),
            "expected Unauthorized, got {anonymous:?}"
        );

        let blocked = ctx
            .checkout
            .checkout(Some(unverified.uuid), checkout_request(&[(product.uuid, -1)]))
            .await;

        assert!(
            matches!(blocked, Err(CheckoutError::EmailNotVerified)),
            "expected EmailNotVerified, got {blocked:?}"
        );

        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let invalid = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(product.uuid, 0)]))
            .await;

        assert!(
            matches!(
                invalid,
                Err(CheckoutError::InvalidRequest(InvalidCheckout::QuantityBelowOne(_)))
            ),
            "expected QuantityBelowOne, got {invalid:?}"
        );
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn authorize_resolves_a_verified_buyer() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        assert_eq!(ctx.checkout.authorize(Some(buyer)).await?, buyer);

        let unknown = ctx.checkout.authorize(Some(UserUuid::new())).await;

        assert!(
            matches!(unknown, Err(CheckoutError::Unauthorized)),
            "expected Unauthorized, got {unknown:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unverified_admin_may_purchase() -> TestResult {
        let ctx = TestContext::new().await;

        let admin = ctx
            .users
            .create_user(new_user("admin@example.com", false, true))
            .await?;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        ctx.checkout
            .checkout(Some(admin.uuid), checkout_request(&[(product.uuid, 1)]))
            .await?;

        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 4);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let result = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[]))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::InvalidRequest(InvalidCheckout::EmptyCart))
            ),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;
        let missing = ProductUuid::new();

        let result = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(missing, 1)]))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::ProductNotFound(uuid)) if uuid == missing),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn mailer_failure_does_not_change_the_result() -> TestResult {
        let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<OutgoingMail>();
        let mut mailer = MockMailer::new();

        mailer.expect_send().times(1).returning(move |mail| {
            let _ = sent_tx.send(mail.clone());

            Err(MailerError::Rejected {
                status: 500,
                body: "mail API down".to_string(),
            })
        });

        let ctx = TestContext::with_mailer(Arc::new(mailer)).await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let order = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(product.uuid, 2)]))
            .await?;

        let mail = timeout(Duration::from_secs(5), sent_rx.recv())
            .await?
            .ok_or("receipt was never sent")?;

        assert_eq!(mail.to, vec!["buyer@example.com".to_string()]);
        assert!(mail.subject.starts_with("Order Confirmation #"));
        assert_eq!(ctx.orders.get_order(buyer, order).await?.total_amount, 2_000);
        assert_eq!(ctx.products.get_product(product.uuid).await?.stock, 3);

        Ok(())
    }

    #[tokio::test]
    async fn price_edits_after_purchase_do_not_reprice_the_order() -> TestResult {
        let ctx = TestContext::new().await;
        let buyer = verified_user(&ctx, "buyer@example.com").await?;

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let order = ctx
            .checkout
            .checkout(Some(buyer), checkout_request(&[(product.uuid, 2)]))
            .await?;

        ctx.products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: Some(9_999),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        let placed = ctx.orders.get_order(buyer, order).await?;

        assert_eq!(placed.total_amount, 2_000);
        assert_eq!(placed.items[0].unit_price, 1_000);

        Ok(())
    }
}
