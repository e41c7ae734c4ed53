use std::sync::Arc;

use tokio::sync::Mutex;

use crate::llm_client::TextService;
use crate::models::message::Message;
use crate::projects::ProjectManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative-AI backend. `LlmClient` in production.
    pub llm: Arc<dyn TextService>,
    pub projects: Arc<ProjectManager>,
    /// Chat history used while no project is selected. Not persisted.
    pub scratch_chat: Arc<Mutex<Vec<Message>>>,
}

impl AppState {
    pub fn new(llm: Arc<dyn TextService>, projects: Arc<ProjectManager>) -> Self {
        Self {
            llm,
            projects,
            scratch_chat: Arc::new(Mutex::new(Vec::new())),
        }
    }
}
