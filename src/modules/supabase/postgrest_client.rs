//! PostgREST client for Supabase tables
//!
//! Implements [`TableStore`] with plain HTTP calls to `/rest/v1/{table}`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::{api_error, Filter, Query, StoreError, StoreResult, TableStore};
use crate::core::config::SupabaseConfig;

pub struct PostgrestClient {
    http_client: Client,
    base_url: String,
    key: String,
}

impl PostgrestClient {
    pub fn new(config: &SupabaseConfig) -> StoreResult<Self> {
        let http_client = Client::builder().build()?;

        Ok(Self {
            http_client,
            base_url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, urlencoding::encode(table))
    }

    /// Attach the project key the way Supabase expects it
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
            .collect()
    }

    fn query_params(query: &Query) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            query.columns.clone().unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(Self::filter_params(&query.filters));

        if let Some(order) = &query.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }

    async fn read_rows(response: Response) -> StoreResult<Vec<Value>> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&body)
            .map_err(|e| StoreError::Decode(format!("invalid JSON from PostgREST: {}", e)))?
        {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            single => Ok(vec![single]),
        }
    }
}

#[async_trait]
impl TableStore for PostgrestClient {
    async fn select(&self, table: &str, query: Query) -> StoreResult<Vec<Value>> {
        let params = Self::query_params(&query);
        debug!("PostgREST select {} {:?}", table, params);

        let response = self
            .authorized(self.http_client.get(self.table_url(table)))
            .query(&params)
            .send()
            .await?;

        Self::read_rows(response).await
    }

    async fn insert(&self, table: &str, row: &Value) -> StoreResult<Vec<Value>> {
        debug!("PostgREST insert into {}", table);

        let response = self
            .authorized(self.http_client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        Self::read_rows(response).await
    }

    async fn update(
        &self,
        table: &str,
        changes: &Value,
        filters: &[Filter],
    ) -> StoreResult<Vec<Value>> {
        debug!("PostgREST update {} where {:?}", table, filters);

        let response = self
            .authorized(self.http_client.patch(self.table_url(table)))
            .query(&Self::filter_params(filters))
            .header("Prefer", "return=representation")
            .json(changes)
            .send()
            .await?;

        Self::read_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Value>> {
        debug!("PostgREST delete from {} where {:?}", table, filters);

        let response = self
            .authorized(self.http_client.delete(self.table_url(table)))
            .query(&Self::filter_params(filters))
            .header("Prefer", "return=representation")
            .send()
            .await?;

        Self::read_rows(response).await
    }
}
