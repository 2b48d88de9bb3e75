//! PostgREST HTTP backend
//!
//! | 操作 | 请求 |
//! |------|------|
//! | insert | `POST /rest/v1/{table}` + `Prefer: return=representation` |
//! | select | `GET /rest/v1/{table}?select=*&col=eq.val&order=col.desc&limit=n` |
//! | update | `PATCH /rest/v1/{table}?col=eq.val` + `Prefer: return=representation` |
//! | delete | `DELETE /rest/v1/{table}?col=eq.val` |
//! | rpc | `POST /rest/v1/rpc/{fn}` |

use super::{Filter, SelectQuery, StoreError, StoreResult, TableStore};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const PREFER_REPRESENTATION: &str = "return=representation";

/// REST table store client
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// `col=eq.value` query pairs
pub(crate) fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
        .collect()
}

pub(crate) fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&query.filters));
    if let Some((column, direction)) = &query.order_by {
        params.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl TableStore for RestStore {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&rows)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn select(&self, table: &str, query: SelectQuery) -> StoreResult<Vec<Value>> {
        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(&select_params(&query))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> StoreResult<Vec<Value>> {
        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .query(&filter_params(filters))
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        let response = self
            .request(Method::DELETE, &self.table_url(table))
            .query(&filter_params(filters))
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        let removed: Vec<Value> = Self::handle_response(response).await?;
        Ok(removed.len() as u64)
    }

    async fn rpc(&self, function: &str, args: Value) -> StoreResult<Value> {
        let body = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        let response = self
            .request(Method::POST, &self.rpc_url(function))
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Direction;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let store =
            RestStore::new("https://demo.supabase.co/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(store.base_url(), "https://demo.supabase.co");
        assert_eq!(
            store.table_url("orders"),
            "https://demo.supabase.co/rest/v1/orders"
        );
        assert_eq!(
            store.rpc_url("generate_order_number"),
            "https://demo.supabase.co/rest/v1/rpc/generate_order_number"
        );
    }

    #[test]
    fn test_select_params() {
        let query = SelectQuery::new()
            .eq("order_id", "o-1")
            .order_by("created_at", Direction::Asc)
            .limit(10);
        let params = select_params(&query);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("order_id".to_string(), "eq.o-1".to_string()),
                ("order".to_string(), "created_at.asc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_params_minimal() {
        assert_eq!(
            select_params(&SelectQuery::new()),
            vec![("select".to_string(), "*".to_string())]
        );
    }
}
