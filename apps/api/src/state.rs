use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::draft::DraftSession;
use crate::generation::Submitter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The draft being edited. Edits are serialized through the lock.
    pub draft: Arc<Mutex<DraftSession>>,
    /// Single-flight gateway to the document-generation endpoint.
    pub submitter: Arc<Submitter>,
    pub config: Config,
}
