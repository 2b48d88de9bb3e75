//! Remote table store
//!
//! Thin row-level access to the hosted tables that back orders. Rows travel
//! as `serde_json::Value` in the store's own column naming (snake_case);
//! typed decoding happens in the repository that owns the table.
//!
//! # Backends
//!
//! | 类型 | 说明 |
//! |------|------|
//! | [`RestStore`] | PostgREST / Supabase HTTP API |
//! | [`MemoryStore`] | 进程内表，支持故障注入 (测试用) |

pub mod memory;
pub mod rest;

pub use memory::{FailPoint, MemoryStore};
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    /// Network-level failure (timeout, connection refused, ...)
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Http(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Whether a row's column holds the filter value
    pub fn matches(&self, row: &Value) -> bool {
        match row.get(&self.column) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Row selection: equality filters, one ordering column, optional limit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row-level table access
///
/// Implementations are stateless from the caller's point of view and are
/// shared process-wide as `Arc<dyn TableStore>`.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert rows, returning them with store-assigned `id` and timestamps
    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>>;

    async fn select(&self, table: &str, query: SelectQuery) -> StoreResult<Vec<Value>>;

    /// Patch matching rows, returning the updated rows
    async fn update(&self, table: &str, filters: &[Filter], patch: Value)
    -> StoreResult<Vec<Value>>;

    /// Delete matching rows, returning how many were removed
    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64>;

    /// Call a stored function
    async fn rpc(&self, function: &str, args: Value) -> StoreResult<Value>;
}
