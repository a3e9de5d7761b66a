use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AppError;

use super::{ChangeEvent, RemoteStore};

/// In-memory stand-in for the hosted record store.
///
/// Serves two purposes: demo data when no remote is configured, and a test
/// double with call counters plus injectable failure modes for the sync
/// engine's degraded paths.
#[derive(Default)]
pub struct MemoryRemoteStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    select_counts: Mutex<HashMap<String, usize>>,
    schema_missing: AtomicBool,
    unreachable: AtomicBool,
    change_tx: Mutex<Option<mpsc::Sender<ChangeEvent>>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with rows (builder style, for tests and demo data).
    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
        self
    }

    /// Make every operation fail as if the expected tables were never created.
    pub fn set_schema_missing(&self, missing: bool) {
        self.schema_missing.store(missing, Ordering::SeqCst);
    }

    /// Make every operation fail as if the network were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// How many times `select_all` ran against a table.
    pub fn select_count(&self, table: &str) -> usize {
        self.select_counts
            .lock()
            .unwrap()
            .get(table)
            .copied()
            .unwrap_or(0)
    }

    /// Current rows of a table (clone, test inspection only).
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Push an event into the change feed, if anyone is subscribed.
    pub async fn emit_change(&self, table: &str) -> bool {
        let sender = self.change_tx.lock().unwrap().clone();
        match sender {
            Some(tx) => tx
                .send(ChangeEvent {
                    table: table.to_string(),
                    event: "UPDATE".to_string(),
                })
                .await
                .is_ok(),
            None => false,
        }
    }

    fn guard(&self, table: &str) -> Result<(), AppError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AppError::Remote(format!(
                "network unreachable while contacting {}",
                table
            )));
        }
        if self.schema_missing.load(Ordering::SeqCst) {
            return Err(AppError::SchemaMissing(format!(
                "relation \"{}\" does not exist",
                table
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn select_all(
        &self,
        table: &str,
        order_desc: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        self.guard(table)?;
        *self
            .select_counts
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_insert(0) += 1;

        let mut rows = self.rows(table);
        if let Some(column) = order_desc {
            rows.sort_by(|a, b| {
                let a = a.get(column).and_then(Value::as_str).unwrap_or("");
                let b = b.get(column).and_then(Value::as_str).unwrap_or("");
                b.cmp(a)
            });
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        self.guard(table)?;
        let mut row = row;
        if let Some(fields) = row.as_object_mut() {
            fields
                .entry("id")
                .or_insert_with(|| json!(Uuid::new_v4().to_string()));
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update_by_id(
        &self,
        table: &str,
        id: &str,
        patch: Value,
    ) -> Result<Vec<Value>, AppError> {
        self.guard(table)?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();

        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if row.get("id").and_then(Value::as_str) != Some(id) {
                continue;
            }
            if let (Some(fields), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                for (key, value) in changes {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, table: &str, id: &str) -> Result<(), AppError> {
        self.guard(table)?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
        }
        Ok(())
    }

    async fn subscribe_changes(&self) -> Result<mpsc::Receiver<ChangeEvent>, AppError> {
        let (tx, rx) = mpsc::channel(16);
        *self.change_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}
