//! Order repository
//!
//! Creates orders as header + items across two store calls, with a
//! compensating delete of the header when the items cannot be written.
//! The store has no multi-statement transactions, so a crash between the
//! two inserts can still leave a `pending` order without items.

use super::money::{compute_totals, validate_request};
use super::rows::{
    NewOrderItemRow, NewOrderRow, ORDER_ITEMS_TABLE, ORDER_NUMBER_FN, ORDERS_TABLE,
    OrderItemRow, OrderRow, row_id,
};
use super::OrderError;
use chrono::Utc;
use crate::store::{Direction, Filter, SelectQuery, StoreError, StoreResult, TableStore};
use serde_json::{Value, json};
use shared::models::{CreateOrderRequest, Order, OrderItem, OrderStatus, OrderWithItems};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Default page size for [`OrderRepository::recent_orders`]
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Upper bound for [`OrderRepository::recent_orders`]
pub const MAX_RECENT_LIMIT: usize = 100;

#[derive(Clone)]
pub struct OrderRepository {
    store: Option<Arc<dyn TableStore>>,
}

impl OrderRepository {
    /// `None` means no store is configured; every operation then fails with
    /// [`OrderError::StoreUnavailable`] without touching the network.
    pub fn new(store: Option<Arc<dyn TableStore>>) -> Self {
        Self { store }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&Arc<dyn TableStore>, OrderError> {
        self.store.as_ref().ok_or_else(|| {
            error!("Order store is not configured");
            OrderError::StoreUnavailable
        })
    }

    /// Create an order and its items
    #[instrument(skip_all, fields(lines = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<OrderWithItems, OrderError> {
        validate_request(request).inspect_err(|e| warn!(error = %e, "Rejected order"))?;
        let store = self.store()?;
        let totals = compute_totals(&request.items);

        let order_number = next_order_number(store.as_ref()).await.map_err(|e| {
            error!(error = %e, "Failed to generate order number");
            OrderError::SequenceGenerationFailed(e)
        })?;

        let header = NewOrderRow::pending(&order_number, totals, &request.customer);
        let order = insert_header(store.as_ref(), &header)
            .await
            .map_err(|e| {
                error!(order_number = %order_number, error = %e, "Failed to create order");
                OrderError::OrderInsertFailed(e)
            })?;

        let items = match insert_items(store.as_ref(), order.id, request).await {
            Ok(items) => items,
            Err(e) => {
                error!(order_id = %order.id, error = %e, "Failed to create order items");
                compensate(store.as_ref(), order.id).await;
                return Err(OrderError::ItemInsertFailed(e));
            }
        };

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total_amount = %order.total_amount,
            total_items = order.total_items,
            "Order created"
        );
        Ok(OrderWithItems {
            order: order.into(),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// Order with its items ordered by creation time; `Ok(None)` when absent
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> Result<Option<OrderWithItems>, OrderError> {
        let store = self.store()?;

        let Some(order) = fetch_order(store.as_ref(), id).await.map_err(query_failed)? else {
            debug!("Order not found");
            return Ok(None);
        };

        let rows = store
            .select(
                ORDER_ITEMS_TABLE,
                SelectQuery::new()
                    .eq("order_id", id)
                    .order_by("created_at", Direction::Asc),
            )
            .await
            .map_err(query_failed)?;
        let items = decode_rows::<OrderItemRow>(rows).map_err(query_failed)?;

        Ok(Some(OrderWithItems {
            order: order.into(),
            items: items.into_iter().map(OrderItem::from).collect(),
        }))
    }

    /// Newest orders first; `limit` is clamped to `1..=MAX_RECENT_LIMIT`
    #[instrument(skip(self))]
    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, OrderError> {
        let store = self.store()?;
        let limit = limit.clamp(1, MAX_RECENT_LIMIT);

        let rows = store
            .select(
                ORDERS_TABLE,
                SelectQuery::new()
                    .order_by("created_at", Direction::Desc)
                    .limit(limit),
            )
            .await
            .map_err(query_failed)?;
        let orders = decode_rows::<OrderRow>(rows).map_err(query_failed)?;
        Ok(orders.into_iter().map(Order::from).collect())
    }

    /// Move an order along the status lifecycle
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<Order, OrderError> {
        let store = self.store()?;

        let current = fetch_order(store.as_ref(), id)
            .await
            .map_err(query_failed)?
            .ok_or(OrderError::NotFound(id))?;

        if !current.status.can_transition_to(next) {
            warn!(from = %current.status, to = %next, "Rejected status change");
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let rows = store
            .update(
                ORDERS_TABLE,
                &[Filter::eq("id", id)],
                json!({ "status": next }),
            )
            .await
            .map_err(query_failed)?;
        let updated = decode_rows::<OrderRow>(rows)
            .map_err(query_failed)?
            .into_iter()
            .next()
            .ok_or(OrderError::NotFound(id))?;

        info!(from = %current.status, to = %next, "Order status changed");
        Ok(updated.into())
    }
}

fn query_failed(e: StoreError) -> OrderError {
    error!(error = %e, "Order query failed");
    OrderError::Query(e)
}

fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

async fn next_order_number(store: &dyn TableStore) -> StoreResult<String> {
    match store.rpc(ORDER_NUMBER_FN, json!({})).await? {
        Value::String(number) if !number.is_empty() => Ok(number),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(StoreError::UnexpectedResponse(format!(
            "order number: {}",
            other
        ))),
    }
}

async fn fetch_order(store: &dyn TableStore, id: Uuid) -> StoreResult<Option<OrderRow>> {
    let rows = store
        .select(ORDERS_TABLE, SelectQuery::new().eq("id", id).limit(1))
        .await?;
    Ok(decode_rows::<OrderRow>(rows)?.into_iter().next())
}

async fn insert_header(store: &dyn TableStore, header: &NewOrderRow<'_>) -> StoreResult<OrderRow> {
    let row = serde_json::to_value(header)?;
    let returned = store
        .insert(ORDERS_TABLE, vec![row])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::UnexpectedResponse("no order row returned".to_string()))?;

    match serde_json::from_value::<OrderRow>(returned.clone()) {
        Ok(order) => Ok(order),
        Err(e) => {
            // The header exists but cannot be read back
            if let Some(id) = row_id(&returned) {
                compensate(store, id).await;
            }
            Err(e.into())
        }
    }
}

async fn insert_items(
    store: &dyn TableStore,
    order_id: Uuid,
    request: &CreateOrderRequest,
) -> StoreResult<Vec<OrderItemRow>> {
    let base = Utc::now();
    let rows = request
        .items
        .iter()
        .enumerate()
        .map(|(i, line)| {
            serde_json::to_value(NewOrderItemRow::snapshot(order_id, i, line, base))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let sent = rows.len();

    let returned = store.insert(ORDER_ITEMS_TABLE, rows).await?;
    if returned.len() < sent {
        return Err(StoreError::UnexpectedResponse(format!(
            "{} of {} order items written",
            returned.len(),
            sent
        )));
    }
    decode_rows(returned)
}

/// Best-effort removal of an order header; failure leaves an orphan
async fn compensate(store: &dyn TableStore, order_id: Uuid) {
    match store
        .delete(ORDERS_TABLE, &[Filter::eq("id", order_id)])
        .await
    {
        Ok(removed) => warn!(%order_id, removed, "Rolled back order header"),
        Err(e) => error!(
            %order_id,
            error = %e,
            "Failed to roll back order header, orphaned pending order left in store"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FailPoint, MemoryStore};
    use rust_decimal::Decimal;
    use shared::models::{CustomerInfo, OrderLineInput};

    fn line(id: &str, name: &str, price: i64, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            id: id.into(),
            name: name.into(),
            category: "主食".into(),
            price: Decimal::from(price),
            quantity,
            popular: None,
        }
    }

    fn request(items: Vec<OrderLineInput>) -> CreateOrderRequest {
        CreateOrderRequest {
            items,
            customer: CustomerInfo::default(),
        }
    }

    fn repo() -> (Arc<MemoryStore>, OrderRepository) {
        let store = Arc::new(MemoryStore::new());
        let repo = OrderRepository::new(Some(store.clone() as Arc<dyn TableStore>));
        (store, repo)
    }

    #[tokio::test]
    async fn test_unconfigured_store() {
        let repo = OrderRepository::new(None);
        assert!(!repo.is_configured());
        let req = request(vec![line("a", "驴肉火烧", 15, 1)]);
        assert!(matches!(
            repo.create_order(&req).await,
            Err(OrderError::StoreUnavailable)
        ));
        assert!(matches!(
            repo.get_order(Uuid::new_v4()).await,
            Err(OrderError::StoreUnavailable)
        ));
        assert!(matches!(
            repo.recent_orders(10).await,
            Err(OrderError::StoreUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_validation_makes_no_store_calls() {
        let (store, repo) = repo();
        assert!(matches!(
            repo.create_order(&request(vec![])).await,
            Err(OrderError::EmptyOrder)
        ));
        assert!(matches!(
            repo.create_order(&request(vec![line("a", "驴肉火烧", 15, 0)]))
                .await,
            Err(OrderError::InvalidItem(_))
        ));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (_store, repo) = repo();
        let created = repo
            .create_order(&request(vec![
                line("a", "驴肉火烧", 15, 2),
                line("b", "小米粥", 5, 1),
            ]))
            .await
            .unwrap();
        assert_eq!(created.order.status, OrderStatus::Pending);
        assert!(created.order.order_number.starts_with("ORD-"));

        let fetched = repo.get_order(created.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.order.id, created.order.id);
        let names: Vec<&str> = fetched.items.iter().map(|i| i.dish_name.as_str()).collect();
        assert_eq!(names, vec!["驴肉火烧", "小米粥"]);
        assert_eq!(fetched.items_total(), fetched.order.total_amount);
    }

    #[tokio::test]
    async fn test_order_insert_failure_writes_no_items() {
        let (store, repo) = repo();
        store.fail(FailPoint::Insert(ORDERS_TABLE.into()));
        let result = repo
            .create_order(&request(vec![line("a", "驴肉火烧", 15, 1)]))
            .await;
        assert!(matches!(result, Err(OrderError::OrderInsertFailed(_))));
        assert!(store.rows(ORDER_ITEMS_TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_partial_item_insert_is_compensated() {
        let (store, repo) = repo();
        store.fail(FailPoint::PartialInsert(ORDER_ITEMS_TABLE.into(), 1));
        let result = repo
            .create_order(&request(vec![
                line("a", "驴肉火烧", 15, 1),
                line("b", "小米粥", 5, 1),
            ]))
            .await;
        assert!(matches!(result, Err(OrderError::ItemInsertFailed(_))));
        assert!(store.rows(ORDERS_TABLE).is_empty());
        assert!(store.rows(ORDER_ITEMS_TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let (_store, repo) = repo();
        let created = repo
            .create_order(&request(vec![line("a", "驴肉火烧", 15, 1)]))
            .await
            .unwrap();
        let id = created.order.id;

        let confirmed = repo.update_status(id, OrderStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert!(confirmed.updated_at > created.order.updated_at);

        assert!(matches!(
            repo.update_status(id, OrderStatus::Completed).await,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Completed
            })
        ));
        assert!(matches!(
            repo.update_status(Uuid::new_v4(), OrderStatus::Confirmed).await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_failures_are_errors() {
        let (store, repo) = repo();
        store.fail(FailPoint::Select(ORDERS_TABLE.into()));
        assert!(matches!(
            repo.get_order(Uuid::new_v4()).await,
            Err(OrderError::Query(_))
        ));
        assert!(matches!(
            repo.recent_orders(5).await,
            Err(OrderError::Query(_))
        ));
    }

    #[tokio::test]
    async fn test_recent_limit_is_clamped() {
        let (_store, repo) = repo();
        for _ in 0..2 {
            repo.create_order(&request(vec![line("a", "驴肉火烧", 15, 1)]))
                .await
                .unwrap();
        }
        assert_eq!(repo.recent_orders(0).await.unwrap().len(), 1);
        assert_eq!(repo.recent_orders(1000).await.unwrap().len(), 2);
    }
}
