//! Application state.
//!
//! One shared state struct holding the repositories, the object storage
//! backend, the injected clock, and the loaded configuration. Handlers
//! extract it via `State<Arc<AppState>>`.

use photoentry_core::{Clock, Config};
use photoentry_db::{DraftRepository, SessionRepository, SubmissionRepository};
use photoentry_storage::ObjectStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRepository,
    pub drafts: DraftRepository,
    pub submissions: SubmissionRepository,
    pub storage: Arc<dyn ObjectStorage>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
