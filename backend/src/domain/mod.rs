//! # Domain Module
//!
//! Business logic for the club-management core: the plan lifecycle rules,
//! collection-change inference, authentication, view access, daily-report
//! prefill, and the built-in seed dataset. Everything here is storage-
//! agnostic; remote effects go through the gateway owned by the caller.

pub mod access;
pub mod daily;
pub mod lifecycle;
pub mod seed;
pub mod session_service;
pub mod sync;

pub use access::{resolve as resolve_view, View};
pub use lifecycle::{initial_status, reconcile, status_correction, EXECUTION_LAPSE_DAYS};
pub use session_service::{AuthError, SessionService};
pub use sync::{infer_change, CollectionChange, Record};
