use std::sync::Arc;

use tracing::{info, warn, Level};

use club_manager_backend::storage::{
    MemoryRecordStore, RecordStore, SessionStore, SqliteRecordStore,
};
use club_manager_backend::{AppConfig, AppController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::from_env();

    info!("Opening record store at {}", config.database_url);
    let store: Arc<dyn RecordStore> = match SqliteRecordStore::new(&config.database_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            // An unusable database is the same as an unreachable one: the
            // gateway serves the built-in dataset instead
            warn!("Record store unavailable, starting in offline mode: {:#}", e);
            Arc::new(MemoryRecordStore::unavailable())
        }
    };

    let session_store = SessionStore::new(&config.session_file);
    let app = AppController::load(store, session_store).await;

    let state = app.state();
    info!(
        "Snapshot ready: {} supervisors ({:?}), {} plans ({:?}), {} members ({:?}), {} reports, {} daily reports, {} awards",
        state.supervisors.len(),
        state.load_sources.supervisors,
        state.plans.len(),
        state.load_sources.plans,
        state.members.len(),
        state.load_sources.members,
        state.reports.len(),
        state.daily_reports.len(),
        state.distinguished.len(),
    );
    match &state.current_user {
        Some(user) => info!("Restored session for {}", user.name),
        None => info!("No active session"),
    }

    Ok(())
}
