//! Column contract for writes to the `imagenes` table
//!
//! Deployments of the table differ in which optional columns exist. A pinned
//! schema version prunes payloads up front; without one, writes that fail on
//! a missing optional column are retried without it.

use serde_json::{Map, Value};
use std::future::Future;
use tracing::warn;

use crate::modules::supabase::{StoreError, StoreResult};

/// Optional column groups, listed in the order they are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalColumns {
    Description,
    Coordinates,
    PublicationType,
}

impl OptionalColumns {
    pub const DROP_ORDER: [OptionalColumns; 3] = [
        OptionalColumns::Description,
        OptionalColumns::Coordinates,
        OptionalColumns::PublicationType,
    ];

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            OptionalColumns::Description => &["description"],
            OptionalColumns::Coordinates => &["lat", "lng"],
            OptionalColumns::PublicationType => &["tipo_publicacion"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSchema {
    /// Detect missing columns from store errors
    Tolerant,
    /// 1: base columns, 2: + lat/lng/tipo_publicacion, 3: + description
    Versioned(u8),
}

impl ImageSchema {
    pub fn from_version(version: Option<u8>) -> Self {
        match version {
            Some(v) => ImageSchema::Versioned(v),
            None => ImageSchema::Tolerant,
        }
    }

    pub fn supports(&self, group: OptionalColumns) -> bool {
        match self {
            ImageSchema::Tolerant => true,
            ImageSchema::Versioned(v) => match group {
                OptionalColumns::Coordinates | OptionalColumns::PublicationType => *v >= 2,
                OptionalColumns::Description => *v >= 3,
            },
        }
    }

    /// Drop fields the declared version does not have
    pub fn prune(&self, payload: &mut Map<String, Value>) {
        for group in OptionalColumns::DROP_ORDER {
            if !self.supports(group) {
                for column in group.columns() {
                    payload.remove(*column);
                }
            }
        }
    }

    /// Column group blamed by `err`, if it is still part of the payload
    pub fn missing_group(
        &self,
        err: &StoreError,
        payload: &Map<String, Value>,
    ) -> Option<OptionalColumns> {
        if let ImageSchema::Versioned(_) = self {
            return None;
        }

        OptionalColumns::DROP_ORDER.into_iter().find(|group| {
            group
                .columns()
                .iter()
                .any(|c| payload.contains_key(*c) && err.mentions_column(c))
        })
    }

    /// Run a write, retrying without optional columns the store rejects
    ///
    /// Returns the store's rows together with the payload that was accepted.
    pub async fn write<F, Fut>(
        &self,
        mut payload: Map<String, Value>,
        mut op: F,
    ) -> StoreResult<(Vec<Value>, Map<String, Value>)>
    where
        F: FnMut(Value) -> Fut,
        Fut: Future<Output = StoreResult<Vec<Value>>>,
    {
        self.prune(&mut payload);

        loop {
            match op(Value::Object(payload.clone())).await {
                Ok(rows) => return Ok((rows, payload)),
                Err(err) => {
                    // Every retry removes at least one present key, so this ends
                    let group = match self.missing_group(&err, &payload) {
                        Some(group) => group,
                        None => return Err(err),
                    };
                    warn!(
                        "Columns {:?} missing from imagenes, retrying without them: {}",
                        group.columns(),
                        err
                    );
                    for column in group.columns() {
                        payload.remove(*column);
                    }
                }
            }
        }
    }
}
