//! In-process table store
//!
//! Mirrors the hosted schema closely enough to drive the repository in tests
//! and in local development without credentials: server-assigned ids and
//! timestamps, the order number function, and the `orders` → `order_items`
//! cascade. Fail points make any step of a multi-call flow fail on demand.

use super::{Filter, SelectQuery, StoreError, StoreResult, TableStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Injected failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailPoint {
    /// Any call of the named function
    Rpc(String),
    /// Any insert into the table
    Insert(String),
    /// Inserts into the table keep only the first `n` rows (no error)
    PartialInsert(String, usize),
    Select(String),
    Update(String),
    Delete(String),
}

struct Table {
    rows: Vec<Value>,
    /// Columns stamped on insert; `updated_at` is also stamped on update
    timestamps: &'static [&'static str],
    /// Child table and foreign key column removed along with a row
    cascade: Option<(&'static str, &'static str)>,
}

impl Table {
    fn new(timestamps: &'static [&'static str]) -> Self {
        Self {
            rows: Vec::new(),
            timestamps,
            cascade: None,
        }
    }
}

struct Inner {
    tables: HashMap<String, Table>,
    fail_points: Vec<FailPoint>,
    epoch: DateTime<Utc>,
    tick: i64,
    order_seq: u32,
    calls: u64,
}

impl Inner {
    /// Strictly increasing timestamp, one millisecond per call
    fn now(&mut self) -> String {
        self.tick += 1;
        (self.epoch + TimeDelta::milliseconds(self.tick))
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn table_mut(&mut self, table: &str) -> StoreResult<&mut Table> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    fn check(&self, point: &FailPoint) -> StoreResult<()> {
        if self.fail_points.contains(point) {
            return Err(StoreError::Injected(format!("{:?}", point)));
        }
        Ok(())
    }

    fn partial_limit(&self, table: &str) -> Option<usize> {
        self.fail_points.iter().find_map(|p| match p {
            FailPoint::PartialInsert(t, n) if t == table => Some(*n),
            _ => None,
        })
    }
}

/// In-memory [`TableStore`]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Store with the `orders` and `order_items` tables
    pub fn new() -> Self {
        let mut orders = Table::new(&["created_at", "updated_at"]);
        orders.cascade = Some(("order_items", "order_id"));

        let mut tables = HashMap::new();
        tables.insert("orders".to_string(), orders);
        tables.insert("order_items".to_string(), Table::new(&["created_at"]));

        Self {
            inner: Mutex::new(Inner {
                tables,
                fail_points: Vec::new(),
                epoch: Utc::now(),
                tick: 0,
                order_seq: 0,
                calls: 0,
            }),
        }
    }

    pub fn fail(&self, point: FailPoint) {
        self.inner.lock().fail_points.push(point);
    }

    /// Remove all fail points
    pub fn heal(&self) {
        self.inner.lock().fail_points.clear();
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner
            .lock()
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Number of trait calls served so far, failed ones included
    pub fn call_count(&self) -> u64 {
        self.inner.lock().calls
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(row))
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        inner.check(&FailPoint::Insert(table.to_string()))?;
        let keep = inner.partial_limit(table).unwrap_or(rows.len());

        // One statement, one `now()` for every row
        let now = inner.now();
        let timestamps = inner.table_mut(table)?.timestamps;
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows.into_iter().take(keep) {
            let Value::Object(mut fields) = row else {
                return Err(StoreError::UnexpectedResponse(format!(
                    "row for {} is not an object",
                    table
                )));
            };
            fields
                .entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            for column in timestamps {
                fields
                    .entry(*column)
                    .or_insert_with(|| Value::String(now.clone()));
            }
            stored.push(Value::Object(fields));
        }

        inner.table_mut(table)?.rows.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn select(&self, table: &str, query: SelectQuery) -> StoreResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        inner.check(&FailPoint::Select(table.to_string()))?;

        let mut rows: Vec<Value> = inner
            .table_mut(table)?
            .rows
            .iter()
            .filter(|row| matches_all(row, &query.filters))
            .cloned()
            .collect();

        if let Some((column, direction)) = &query.order_by {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match direction {
                    super::Direction::Asc => ord,
                    super::Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> StoreResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        inner.check(&FailPoint::Update(table.to_string()))?;

        let Value::Object(patch) = patch else {
            return Err(StoreError::UnexpectedResponse(
                "patch is not an object".to_string(),
            ));
        };
        let stamp_updated = inner.table_mut(table)?.timestamps.contains(&"updated_at");
        let now = inner.now();

        let mut updated = Vec::new();
        for row in inner.table_mut(table)?.rows.iter_mut() {
            if !matches_all(row, filters) {
                continue;
            }
            if let Value::Object(fields) = row {
                apply_patch(fields, &patch);
                if stamp_updated {
                    fields.insert("updated_at".to_string(), Value::String(now.clone()));
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        inner.check(&FailPoint::Delete(table.to_string()))?;

        let target = inner.table_mut(table)?;
        let cascade = target.cascade;
        let (removed, kept): (Vec<Value>, Vec<Value>) = target
            .rows
            .drain(..)
            .partition(|row| matches_all(row, filters));
        target.rows = kept;

        if let Some((child, foreign_key)) = cascade {
            let parent_ids: Vec<String> = removed
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_str).map(str::to_string))
                .collect();
            if let Ok(child_table) = inner.table_mut(child) {
                child_table.rows.retain(|row| {
                    row.get(foreign_key)
                        .and_then(Value::as_str)
                        .is_none_or(|fk| !parent_ids.iter().any(|id| id == fk))
                });
            }
        }
        Ok(removed.len() as u64)
    }

    async fn rpc(&self, function: &str, _args: Value) -> StoreResult<Value> {
        let mut inner = self.inner.lock();
        inner.calls += 1;
        inner.check(&FailPoint::Rpc(function.to_string()))?;

        match function {
            "generate_order_number" => {
                inner.order_seq += 1;
                let number = format!(
                    "ORD-{}-{:04}",
                    Utc::now().format("%Y%m%d"),
                    inner.order_seq
                );
                Ok(Value::String(number))
            }
            other => Err(StoreError::UnknownFunction(other.to_string())),
        }
    }
}

fn apply_patch(fields: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        fields.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Direction;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let rows = store
            .insert("orders", vec![json!({"order_number": "ORD-1"})])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
        assert!(row["created_at"].is_string());
        assert_eq!(row["created_at"], row["updated_at"]);
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase() {
        let store = MemoryStore::new();
        let a = store.insert("orders", vec![json!({})]).await.unwrap();
        let b = store.insert("orders", vec![json!({})]).await.unwrap();
        assert!(b[0]["created_at"].as_str().unwrap() > a[0]["created_at"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_bulk_insert_shares_one_timestamp() {
        let store = MemoryStore::new();
        let rows = store
            .insert(
                "order_items",
                vec![
                    json!({"dish_name": "a"}),
                    json!({"dish_name": "b"}),
                    json!({"dish_name": "c", "created_at": "2024-01-01T00:00:00.000000Z"}),
                ],
            )
            .await
            .unwrap();
        assert_eq!(rows[0]["created_at"], rows[1]["created_at"]);
        assert_eq!(rows[2]["created_at"], "2024-01-01T00:00:00.000000Z");
    }

    #[tokio::test]
    async fn test_select_orders_and_limits() {
        let store = MemoryStore::new();
        for n in 1..=4 {
            store
                .insert("orders", vec![json!({"order_number": format!("N{n}")})])
                .await
                .unwrap();
        }
        let rows = store
            .select(
                "orders",
                SelectQuery::new()
                    .order_by("created_at", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        let numbers: Vec<&str> = rows
            .iter()
            .map(|r| r["order_number"].as_str().unwrap())
            .collect();
        assert_eq!(numbers, vec!["N4", "N3"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let store = MemoryStore::new();
        let order = store.insert("orders", vec![json!({})]).await.unwrap();
        let id = order[0]["id"].as_str().unwrap().to_string();
        store
            .insert(
                "order_items",
                vec![json!({"order_id": id}), json!({"order_id": "other"})],
            )
            .await
            .unwrap();

        let removed = store.delete("orders", &[Filter::eq("id", &id)]).await.unwrap();
        assert_eq!(removed, 1);
        let items = store.rows("order_items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["order_id"], "other");
    }

    #[tokio::test]
    async fn test_update_patches_and_stamps() {
        let store = MemoryStore::new();
        let order = store
            .insert("orders", vec![json!({"status": "pending"})])
            .await
            .unwrap();
        let id = order[0]["id"].as_str().unwrap();
        let updated = store
            .update("orders", &[Filter::eq("id", id)], json!({"status": "confirmed"}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["status"], "confirmed");
        assert!(updated[0]["updated_at"].as_str() > order[0]["updated_at"].as_str());
    }

    #[tokio::test]
    async fn test_order_number_sequence() {
        let store = MemoryStore::new();
        let first = store.rpc("generate_order_number", json!({})).await.unwrap();
        let second = store.rpc("generate_order_number", json!({})).await.unwrap();
        let first = first.as_str().unwrap();
        assert!(first.starts_with("ORD-"));
        assert!(first.ends_with("-0001"));
        assert!(second.as_str().unwrap().ends_with("-0002"));

        assert!(matches!(
            store.rpc("nope", Value::Null).await,
            Err(StoreError::UnknownFunction(_))
        ));
    }

    #[tokio::test]
    async fn test_fail_points() {
        let store = MemoryStore::new();
        store.fail(FailPoint::Insert("orders".into()));
        assert!(matches!(
            store.insert("orders", vec![json!({})]).await,
            Err(StoreError::Injected(_))
        ));
        assert!(store.rows("orders").is_empty());

        store.heal();
        store.fail(FailPoint::PartialInsert("order_items".into(), 1));
        let rows = store
            .insert("order_items", vec![json!({}), json!({})])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.select("dishes", SelectQuery::new()).await,
            Err(StoreError::UnknownTable(_))
        ));
    }
}
