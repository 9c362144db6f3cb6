//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    database::Db,
    domain::{
        orders::{
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid, StoreStats},
            repository::PgOrdersRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut orders = self.repository.list_orders(&mut tx, user).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self.repository.list_order_items(&mut tx, &uuids).await?;

        tx.commit().await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self.repository.get_order(&mut tx, user, order).await?;

        record.items = self.repository.list_order_items(&mut tx, &[order]).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn store_stats(&self) -> Result<StoreStats, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let stats = self.repository.store_stats(&mut tx).await?;

        tx.commit().await?;

        Ok(stats)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Orders placed by a user, newest first, with their items.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A single order of a user. Orders of other users are reported as not found.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn store_stats(&self) -> Result<StoreStats, OrdersServiceError>;
}
