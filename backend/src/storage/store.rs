//! # Record Store Trait
//!
//! Abstraction over the remote record-oriented persistence service, so the
//! gateway can work against SQLite, an in-memory fixture, or any other
//! backend without modification. Records travel as JSON values; the typed
//! layer lives in the gateway.

use async_trait::async_trait;
use serde_json::Value;

use super::error::StoreError;

/// Table names for the seven entity collections
pub mod tables {
    pub const SUPERVISORS: &str = "supervisors";
    pub const PLANS: &str = "plans";
    pub const MEMBERS: &str = "members";
    pub const REPORTS: &str = "reports";
    pub const DAILY_REPORTS: &str = "daily_reports";
    pub const DISTINGUISHED: &str = "distinguished_supervisors";
    pub const SETTINGS: &str = "settings";

    /// Every table, in schema-setup order
    pub const ALL: [&str; 7] = [
        SUPERVISORS,
        PLANS,
        MEMBERS,
        REPORTS,
        DAILY_REPORTS,
        DISTINGUISHED,
        SETTINGS,
    ];
}

/// Fixed id of the singleton settings row
pub const SETTINGS_ROW_ID: &str = "1";

/// Trait defining the interface for remote record storage operations
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record in a table
    async fn fetch_all(&self, table: &str) -> Result<Vec<Value>, StoreError>;

    /// Fetch a single record by id; `RowMissing` if the id is absent
    async fn fetch_one(&self, table: &str, id: &str) -> Result<Value, StoreError>;

    /// Insert or replace a record by id
    async fn upsert(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError>;

    /// Delete a record by id; deleting an absent id is not an error
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
}
