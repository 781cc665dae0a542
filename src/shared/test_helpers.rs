//! In-memory stand-ins for the Supabase stores

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::modules::supabase::{
    Filter, ObjectStore, Query, StoreError, StoreResult, TableStore,
};

fn matches(row: &Map<String, Value>, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match row.get(&filter.column) {
        Some(Value::String(s)) => *s == filter.value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == filter.value,
    })
}

fn sort_key(row: &Map<String, Value>, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => format!("{:0>20}", other.to_string()),
    }
}

#[derive(Default)]
struct TableState {
    tables: HashMap<String, Vec<Map<String, Value>>>,
    missing_columns: HashMap<String, Vec<String>>,
    fail_writes: Option<String>,
    write_count: usize,
}

/// PostgREST-like table store kept in memory
#[derive(Default)]
pub struct MemoryTableStore {
    state: Mutex<TableState>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes naming any of `columns`, the way PostgREST does for
    /// columns absent from its schema cache
    pub fn with_missing_columns(self, table: &str, columns: &[&str]) -> Self {
        self.state.lock().unwrap().missing_columns.insert(
            table.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        let entry = state.tables.entry(table.to_string()).or_default();
        for row in rows {
            if let Value::Object(map) = row {
                entry.push(map);
            }
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Make every insert and update fail with `message`
    pub fn fail_writes(&self, message: &str) {
        self.state.lock().unwrap().fail_writes = Some(message.to_string());
    }

    /// Insert and update attempts, successful or not
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_count
    }

    fn check_write(state: &mut TableState, table: &str, payload: &Value) -> StoreResult<()> {
        state.write_count += 1;

        if let Some(message) = &state.fail_writes {
            return Err(StoreError::Api {
                status: 403,
                code: Some("42501".to_string()),
                message: message.clone(),
            });
        }

        let missing = state.missing_columns.get(table);
        if let (Some(missing), Value::Object(fields)) = (missing, payload) {
            if let Some(column) = missing.iter().find(|c| fields.contains_key(c.as_str())) {
                return Err(StoreError::Api {
                    status: 400,
                    code: Some("PGRST204".to_string()),
                    message: format!(
                        "Could not find the '{}' column of '{}' in the schema cache",
                        column, table
                    ),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn select(&self, table: &str, query: Query) -> StoreResult<Vec<Value>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Map<String, Value>> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by_key(|row| sort_key(row, &order.column));
            if order.descending {
                rows.reverse();
            }
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let projection: Option<HashSet<String>> = query
            .columns
            .as_deref()
            .filter(|c| *c != "*")
            .map(|c| c.split(',').map(|s| s.trim().to_string()).collect());

        Ok(rows
            .into_iter()
            .map(|row| match &projection {
                Some(keep) => Value::Object(
                    row.into_iter()
                        .filter(|(key, _)| keep.contains(key))
                        .collect(),
                ),
                None => Value::Object(row),
            })
            .collect())
    }

    async fn insert(&self, table: &str, row: &Value) -> StoreResult<Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&mut state, table, row)?;

        let mut fields = match row {
            Value::Object(fields) => fields.clone(),
            _ => return Err(StoreError::Decode("row must be an object".to_string())),
        };

        let rows = state.tables.entry(table.to_string()).or_default();
        if !fields.contains_key("id") {
            let next_id = rows
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_i64))
                .max()
                .unwrap_or(0)
                + 1;
            fields.insert("id".to_string(), Value::from(next_id));
        }
        rows.push(fields.clone());

        Ok(vec![Value::Object(fields)])
    }

    async fn update(
        &self,
        table: &str,
        changes: &Value,
        filters: &[Filter],
    ) -> StoreResult<Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        Self::check_write(&mut state, table, changes)?;

        let Value::Object(changes) = changes else {
            return Err(StoreError::Decode("changes must be an object".to_string()));
        };

        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| matches(row, filters)) {
                for (key, value) in changes {
                    row.insert(key.clone(), value.clone());
                }
                updated.push(Value::Object(row.clone()));
            }
        }

        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Value>> {
        let mut state = self.state.lock().unwrap();
        let mut deleted = Vec::new();

        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| {
                if matches(row, filters) {
                    deleted.push(Value::Object(row.clone()));
                    false
                } else {
                    true
                }
            });
        }

        Ok(deleted)
    }
}

#[derive(Default)]
struct ObjectState {
    objects: Vec<String>,
    removed: Vec<String>,
    fail_uploads: bool,
}

/// Bucket kept in memory; only object paths are tracked
#[derive(Default)]
pub struct MemoryObjectStore {
    state: Mutex<ObjectState>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, path: &str) {
        self.state.lock().unwrap().objects.push(path.to_string());
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn fail_uploads(&self) {
        self.state.lock().unwrap().fail_uploads = true;
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, path: &str, _data: Vec<u8>, _content_type: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_uploads {
            return Err(StoreError::Api {
                status: 400,
                code: None,
                message: "Bucket not found".to_string(),
            });
        }
        if state.objects.iter().any(|p| p == path) {
            return Err(StoreError::Api {
                status: 409,
                code: None,
                message: "The resource already exists".to_string(),
            });
        }
        state.objects.push(path.to_string());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/images/{}", path)
    }

    async fn remove(&self, paths: &[String]) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.objects.retain(|p| !paths.contains(p));
        state.removed.extend(paths.iter().cloned());
        Ok(())
    }
}

/// `usuarios_administradores` row with a cheap bcrypt hash of `password`
pub fn admin_row(id: i64, username: &str, password: &str) -> Value {
    let hash = bcrypt::hash(password, 4).unwrap();
    serde_json::json!({
        "id": id,
        "nombre de usuario": username,
        "contraseña_hash": hash,
        "actualizado_at": null,
    })
}
