//! # Club Manager Backend
//!
//! State synchronization core for the club-management application: loads
//! every entity collection from a remote record store with graceful
//! degradation to built-in seed data, keeps plan lifecycle statuses
//! current, mirrors local mutations to the store optimistically, and
//! manages the authenticated session.
//!
//! The views (forms, printable layouts, dashboard) render straight off
//! [`AppState`] and mutate it exclusively through [`AppController`].

pub mod app;
pub mod config;
pub mod domain;
pub mod storage;

pub use app::{AppController, AppState, AppliedChange, LoadSources};
pub use config::AppConfig;
