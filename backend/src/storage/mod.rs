//! # Storage Module
//!
//! Remote record access and local durability: the [`RecordStore`] trait and
//! its SQLite/in-memory implementations, the [`PersistenceGateway`] that
//! shields the rest of the application from remote failures, and the
//! file-backed [`SessionStore`].

pub mod error;
pub mod gateway;
pub mod memory;
pub mod session;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreErrorKind};
pub use gateway::{Fetched, LoadSource, PersistenceGateway, SyncOutcome};
pub use memory::MemoryRecordStore;
pub use session::SessionStore;
pub use sqlite::SqliteRecordStore;
pub use store::{RecordStore, SETTINGS_ROW_ID};
