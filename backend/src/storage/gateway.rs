//! # Persistence Gateway
//!
//! The trust boundary in front of the remote record store. Nothing above
//! this layer ever observes a remote error directly: reads fall back to the
//! built-in seed dataset (supervisors, plans, members) or an empty
//! collection (everything else), and writes are attempted once and
//! reported, never raised.
//!
//! Schema-mismatch failures (missing table/column, absent singleton row)
//! are expected on unprovisioned backends and stay silent; connectivity and
//! other backend failures are logged for operator visibility.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use shared::{
    DailyReport, DistinguishedSupervisor, Member, ProgramPlan, ProgramReport, Supervisor,
    SystemSettings,
};

use crate::domain::seed;
use crate::storage::error::{StoreError, StoreErrorKind};
use crate::storage::store::{tables, RecordStore, SETTINGS_ROW_ID};

/// Where a fetched collection actually came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The remote store answered
    Remote,
    /// The remote store was unreachable or unprovisioned; built-in seed data
    Seed,
    /// The read failed and this entity has no seed; an empty collection
    Empty,
}

/// A fetched collection together with its provenance
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub records: Vec<T>,
    pub source: LoadSource,
}

/// Result of an optimistic write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote store accepted the write
    Confirmed,
    /// The write was dropped after one attempt (plus the password retry for
    /// supervisors); local state keeps the change regardless
    Dropped,
}

/// Service wrapping all remote record access
pub struct PersistenceGateway {
    store: Arc<dyn RecordStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // --- Reads ---

    pub async fn fetch_supervisors(&self) -> Fetched<Supervisor> {
        self.fetch_with_seed(tables::SUPERVISORS, seed::supervisors).await
    }

    pub async fn fetch_plans(&self) -> Fetched<ProgramPlan> {
        self.fetch_with_seed(tables::PLANS, seed::plans).await
    }

    pub async fn fetch_members(&self) -> Fetched<Member> {
        self.fetch_with_seed(tables::MEMBERS, seed::members).await
    }

    pub async fn fetch_reports(&self) -> Fetched<ProgramReport> {
        self.fetch_plain(tables::REPORTS).await
    }

    pub async fn fetch_daily_reports(&self) -> Fetched<DailyReport> {
        self.fetch_plain(tables::DAILY_REPORTS).await
    }

    pub async fn fetch_distinguished(&self) -> Fetched<DistinguishedSupervisor> {
        self.fetch_plain(tables::DISTINGUISHED).await
    }

    /// Fetch the singleton settings row, falling back to the built-in
    /// defaults on any failure
    pub async fn fetch_settings(&self) -> (SystemSettings, LoadSource) {
        match self.store.fetch_one(tables::SETTINGS, SETTINGS_ROW_ID).await {
            Ok(row) => match serde_json::from_value(row) {
                Ok(settings) => (settings, LoadSource::Remote),
                Err(e) => {
                    error!("Undecodable settings row, using defaults: {}", e);
                    (seed::settings(), LoadSource::Seed)
                }
            },
            Err(e) => {
                self.log_read_failure("fetch_settings", &e);
                (seed::settings(), LoadSource::Seed)
            }
        }
    }

    /// Direct remote lookup of a supervisor by case-insensitive email.
    ///
    /// Used only by login: no seed fallback here, so an unreachable store
    /// yields `None` and the caller falls back to its local collection.
    pub async fn find_supervisor_by_email(&self, email: &str) -> Option<Supervisor> {
        let rows = match self.store.fetch_all(tables::SUPERVISORS).await {
            Ok(rows) => rows,
            Err(e) => {
                self.log_read_failure("find_supervisor_by_email", &e);
                return None;
            }
        };

        let email = email.trim();
        Self::decode_rows::<Supervisor>(tables::SUPERVISORS, rows)
            .into_iter()
            .find(|s| s.email.eq_ignore_ascii_case(email))
    }

    // --- Writes ---

    /// Upsert a supervisor, retrying once without the `password` field when
    /// the remote schema predates that column
    pub async fn upsert_supervisor(&self, supervisor: &Supervisor) -> SyncOutcome {
        let record = match serialize(supervisor) {
            Some(record) => record,
            None => return SyncOutcome::Dropped,
        };

        match self.store.upsert(tables::SUPERVISORS, &supervisor.id, record.clone()).await {
            Ok(()) => SyncOutcome::Confirmed,
            Err(e) if e.is_schema_mismatch() => {
                warn!("Schema mismatch upserting supervisor (likely missing password column), retrying without password");
                let mut stripped = record;
                if let Some(fields) = stripped.as_object_mut() {
                    fields.remove("password");
                }
                match self.store.upsert(tables::SUPERVISORS, &supervisor.id, stripped).await {
                    Ok(()) => SyncOutcome::Confirmed,
                    Err(retry_err) => {
                        if !retry_err.is_schema_mismatch() {
                            error!("Error in upsert_supervisor (retry failed): {}", retry_err);
                        }
                        SyncOutcome::Dropped
                    }
                }
            }
            Err(e) => {
                self.log_write_failure("upsert_supervisor", &e);
                SyncOutcome::Dropped
            }
        }
    }

    pub async fn delete_supervisor(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_supervisor", tables::SUPERVISORS, id).await
    }

    pub async fn upsert_plan(&self, plan: &ProgramPlan) -> SyncOutcome {
        self.upsert_record("upsert_plan", tables::PLANS, &plan.id, plan).await
    }

    pub async fn delete_plan(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_plan", tables::PLANS, id).await
    }

    pub async fn upsert_member(&self, member: &Member) -> SyncOutcome {
        self.upsert_record("upsert_member", tables::MEMBERS, &member.id, member).await
    }

    pub async fn delete_member(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_member", tables::MEMBERS, id).await
    }

    pub async fn upsert_report(&self, report: &ProgramReport) -> SyncOutcome {
        self.upsert_record("upsert_report", tables::REPORTS, &report.id, report).await
    }

    pub async fn delete_report(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_report", tables::REPORTS, id).await
    }

    pub async fn upsert_daily_report(&self, report: &DailyReport) -> SyncOutcome {
        self.upsert_record("upsert_daily_report", tables::DAILY_REPORTS, &report.id, report)
            .await
    }

    pub async fn delete_daily_report(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_daily_report", tables::DAILY_REPORTS, id).await
    }

    pub async fn upsert_distinguished(&self, entry: &DistinguishedSupervisor) -> SyncOutcome {
        self.upsert_record("upsert_distinguished", tables::DISTINGUISHED, &entry.id, entry)
            .await
    }

    pub async fn delete_distinguished(&self, id: &str) -> SyncOutcome {
        self.delete_record("delete_distinguished", tables::DISTINGUISHED, id).await
    }

    /// Overwrite the singleton settings row
    pub async fn save_settings(&self, settings: &SystemSettings) -> SyncOutcome {
        self.upsert_record("save_settings", tables::SETTINGS, SETTINGS_ROW_ID, settings)
            .await
    }

    // --- Shared plumbing ---

    /// Fetch a bootstrap-critical collection: seed data keeps the
    /// application usable when the store is unreachable or unprovisioned.
    /// Other backend failures yield an empty collection, like any entity.
    async fn fetch_with_seed<T: DeserializeOwned>(
        &self,
        table: &str,
        seed: fn() -> Vec<T>,
    ) -> Fetched<T> {
        match self.store.fetch_all(table).await {
            Ok(rows) => Fetched {
                records: Self::decode_rows(table, rows),
                source: LoadSource::Remote,
            },
            Err(e) if e.is_schema_mismatch() || e.kind == StoreErrorKind::Unavailable => {
                self.log_read_failure(table, &e);
                Fetched {
                    records: seed(),
                    source: LoadSource::Seed,
                }
            }
            Err(e) => {
                self.log_read_failure(table, &e);
                Fetched {
                    records: Vec::new(),
                    source: LoadSource::Empty,
                }
            }
        }
    }

    /// Fetch a collection with no seed; failures yield an empty collection
    async fn fetch_plain<T: DeserializeOwned>(&self, table: &str) -> Fetched<T> {
        match self.store.fetch_all(table).await {
            Ok(rows) => Fetched {
                records: Self::decode_rows(table, rows),
                source: LoadSource::Remote,
            },
            Err(e) => {
                self.log_read_failure(table, &e);
                Fetched {
                    records: Vec::new(),
                    source: LoadSource::Empty,
                }
            }
        }
    }

    async fn upsert_record<T: Serialize>(
        &self,
        operation: &str,
        table: &str,
        id: &str,
        record: &T,
    ) -> SyncOutcome {
        let record = match serialize(record) {
            Some(record) => record,
            None => return SyncOutcome::Dropped,
        };

        match self.store.upsert(table, id, record).await {
            Ok(()) => SyncOutcome::Confirmed,
            Err(e) => {
                self.log_write_failure(operation, &e);
                SyncOutcome::Dropped
            }
        }
    }

    async fn delete_record(&self, operation: &str, table: &str, id: &str) -> SyncOutcome {
        match self.store.delete(table, id).await {
            Ok(()) => SyncOutcome::Confirmed,
            Err(e) => {
                self.log_write_failure(operation, &e);
                SyncOutcome::Dropped
            }
        }
    }

    /// Decode fetched rows, skipping any that no longer match the entity
    /// shape rather than failing the whole collection
    fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
        rows.into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping undecodable row in {}: {}", table, e);
                    None
                }
            })
            .collect()
    }

    fn log_read_failure(&self, operation: &str, err: &StoreError) {
        if err.is_schema_mismatch() {
            // Expected while the backend is unprovisioned; stay quiet
            return;
        }
        match err.kind {
            StoreErrorKind::Unavailable => warn!("Store unreachable in {}: {}", operation, err),
            _ => error!("Error in {}: {}", operation, err),
        }
    }

    fn log_write_failure(&self, operation: &str, err: &StoreError) {
        if err.is_schema_mismatch() {
            return;
        }
        match err.kind {
            StoreErrorKind::Unavailable => warn!("Dropped write in {}: {}", operation, err),
            _ => error!("Error in {}: {}", operation, err),
        }
    }
}

fn serialize<T: Serialize>(record: &T) -> Option<Value> {
    match serde_json::to_value(record) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Unserializable record: {}", e);
            None
        }
    }
}
