pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::AppError;

pub use http::{HttpRemoteStore, RemoteStoreConfig};
pub use memory::MemoryRemoteStore;

/// The six logical tables on the remote store.
pub mod tables {
    pub const DOCTORS: &str = "doctors";
    pub const DEPARTMENTS: &str = "departments";
    pub const SERVICES: &str = "services";
    pub const APPOINTMENTS: &str = "appointments";
    pub const NOTICES: &str = "notices";
    pub const HOSPITAL_CONFIG: &str = "hospital_config";
}

/// Table names to try for a write, primary first. Reads use the primary name
/// only; the config table keeps its legacy alternate spelling as a write
/// candidate because old deployments created it without the underscore.
pub fn write_candidates(table: &str) -> &'static [&'static str] {
    match table {
        "doctors" => &["doctors"],
        "departments" => &["departments"],
        "services" => &["services"],
        "appointments" => &["appointments"],
        "notices" => &["notices"],
        "hospital_config" => &["hospital_config", "hospitalconfig"],
        _ => &[],
    }
}

/// One entry from the schema-wide change feed. Deliberately coarse: the sync
/// engine refetches everything on any event, so table and kind are only used
/// for logging.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub table: String,
    pub event: String,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Select every row of a table, optionally ordered by a column descending.
    async fn select_all(
        &self,
        table: &str,
        order_desc: Option<&str>,
    ) -> Result<Vec<Value>, AppError>;

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError>;

    /// Patch a row by id; returns the updated rows so callers can detect a
    /// missing target (empty result).
    async fn update_by_id(
        &self,
        table: &str,
        id: &str,
        patch: Value,
    ) -> Result<Vec<Value>, AppError>;

    async fn delete_by_id(&self, table: &str, id: &str) -> Result<(), AppError>;

    /// Subscribe to the schema-wide change feed. The receiver closes when the
    /// underlying connection drops; callers re-subscribe.
    async fn subscribe_changes(&self) -> Result<mpsc::Receiver<ChangeEvent>, AppError>;
}
