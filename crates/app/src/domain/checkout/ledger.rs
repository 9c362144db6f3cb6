//! Stock ledger.
//!
//! Product stock is the only contended state in checkout. Every operation runs
//! inside the caller's transaction.

use sqlx::{Postgres, Transaction, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::encode_amount,
    domain::products::records::{ProductRecord, ProductUuid},
};

const SNAPSHOT_PRODUCTS_SQL: &str = include_str!("sql/snapshot_products.sql");
const CHECK_AVAILABILITY_SQL: &str = include_str!("sql/check_availability.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStockLedger;

impl PgStockLedger {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Read every referenced product in one round trip. Unknown ids are simply
    /// absent from the result.
    pub(crate) async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(SNAPSHOT_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn check_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CHECK_AVAILABILITY_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Take `quantity` units from an active product's stock.
    ///
    /// Returns the remaining stock, or `None` when the product no longer has
    /// `quantity` units (or was archived) by the time the row lock is acquired.
    pub(crate) async fn decrement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<u32>, sqlx::Error> {
        let remaining = query_scalar::<Postgres, i64>(DECREMENT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(encode_amount(u64::from(quantity))?)
            .fetch_optional(&mut **tx)
            .await?;

        remaining
            .map(|stock| {
                u32::try_from(stock).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "stock".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    #[tokio::test]
    async fn decrement_takes_stock_while_it_lasts() -> TestResult {
        let ctx = TestContext::new().await;
        let ledger = PgStockLedger::new();

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let mut tx = ctx.db.begin_test_transaction().await;

        assert_eq!(ledger.decrement(&mut tx, product.uuid, 3).await?, Some(2));
        assert_eq!(ledger.decrement(&mut tx, product.uuid, 3).await?, None);
        assert_eq!(ledger.decrement(&mut tx, product.uuid, 2).await?, Some(0));

        let fresh = ledger
            .check_availability(&mut tx, product.uuid)
            .await?
            .ok_or("product vanished")?;

        assert_eq!(fresh.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_refuses_archived_products() -> TestResult {
        let ctx = TestContext::new().await;
        let ledger = PgStockLedger::new();

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        ctx.products.archive_product(product.uuid).await?;

        let mut tx = ctx.db.begin_test_transaction().await;

        assert_eq!(ledger.decrement(&mut tx, product.uuid, 1).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_skips_unknown_products() -> TestResult {
        let ctx = TestContext::new().await;
        let ledger = PgStockLedger::new();

        let product = ctx
            .products
            .create_product(new_product("Whey", "protein", 1_000, 5))
            .await?;

        let mut tx = ctx.db.begin_test_transaction().await;

        let snapshot = ledger
            .snapshot(&mut tx, &[product.uuid, ProductUuid::new()])
            .await?;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].uuid, product.uuid);

        Ok(())
    }
}
