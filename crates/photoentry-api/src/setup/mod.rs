//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use photoentry_core::{Config, SystemClock};
use photoentry_db::{DraftRepository, SessionRepository, SubmissionRepository};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry();
    tracing::info!(environment = %config.environment(), "Configuration loaded");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config)?;

    let state = Arc::new(AppState {
        sessions: SessionRepository::new(pool.clone()),
        drafts: DraftRepository::new(pool.clone()),
        submissions: SubmissionRepository::new(pool),
        storage,
        clock: Arc::new(SystemClock),
        config: config.clone(),
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
