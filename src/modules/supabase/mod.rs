//! Supabase access layer
//!
//! The service talks to two Supabase products: PostgREST for the tables and
//! Storage for uploaded images. Both sit behind small traits so features can
//! be exercised against in-memory stores.

mod postgrest_client;
mod storage_client;

pub use postgrest_client::PostgrestClient;
pub use storage_client::SupabaseStorageClient;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Whether the error names `column`, as PostgREST and Postgres do when a
    /// write targets a column missing from the live schema
    pub fn mentions_column(&self, column: &str) -> bool {
        match self {
            StoreError::Api { message, .. } => {
                message.contains(&format!("'{}'", column))
                    || message.contains(&format!("\"{}\"", column))
            }
            _ => false,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Equality filter (`column=eq.value`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Read query against one table
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Comma-separated column list, `*` when unset
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row-level operations on the relational store
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, table: &str, query: Query) -> StoreResult<Vec<Value>>;

    /// Insert one row, returning the stored representation
    async fn insert(&self, table: &str, row: &Value) -> StoreResult<Vec<Value>>;

    /// Apply `changes` to every row matching `filters`, returning updated rows
    async fn update(&self, table: &str, changes: &Value, filters: &[Filter])
        -> StoreResult<Vec<Value>>;

    /// Delete every row matching `filters`, returning deleted rows
    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Value>>;
}

/// Object operations on the configured bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str, data: Vec<u8>, content_type: &str) -> StoreResult<()>;

    fn public_url(&self, path: &str) -> String;

    async fn remove(&self, paths: &[String]) -> StoreResult<()>;
}

/// Deserialize raw rows into a record type
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

/// Error body shared by PostgREST (`message`, `details`, `hint`, `code`) and
/// Storage (`message`, `error`, `statusCode`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    error: Option<String>,
}

/// Turn a non-2xx response into `StoreError::Api`
async fn api_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => {
            let mut message = parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| body.clone());
            if let Some(details) = parsed.details {
                message = format!("{} ({})", message, details);
            }
            StoreError::Api {
                status,
                code: parsed.code,
                message,
            }
        }
        Err(_) => StoreError::Api {
            status,
            code: None,
            message: body,
        },
    }
}
