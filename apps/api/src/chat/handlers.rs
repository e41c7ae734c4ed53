//! Axum route handlers for the chat assistant.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{project_context, send_message};
use crate::errors::AppError;
use crate::models::message::Message;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub project_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub history: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub project_id: Option<Uuid>,
}

/// POST /api/v1/chat
///
/// With a project, the conversation uses its case facts and is saved on the
/// project. Without one it goes to the in-memory scratch history.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let history = match request.project_id {
        Some(id) => {
            let _turn = state.projects.lock_chat(id).await;
            let project = state.projects.get(id).await?;
            let context = project_context(&project.data, project.reports.as_ref());
            let project_name = Some(project.data.company_name.as_str())
                .filter(|name| !name.trim().is_empty());
            let history = send_message(
                state.llm.as_ref(),
                Some(context.as_str()),
                project_name,
                project.chat_history,
                &request.message,
            )
            .await;
            state.projects.update_chat_history(id, history.clone()).await?;
            history
        }
        None => {
            // Held across the model call like the per-project turn lock, so
            // a clear waits for the turn in flight.
            let mut scratch = state.scratch_chat.lock().await;
            let history = send_message(
                state.llm.as_ref(),
                None,
                None,
                std::mem::take(&mut *scratch),
                &request.message,
            )
            .await;
            *scratch = history.clone();
            history
        }
    };

    Ok(Json(ChatResponse { history }))
}

/// DELETE /api/v1/chat
pub async fn handle_clear_chat(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<StatusCode, AppError> {
    match query.project_id {
        Some(id) => {
            let _turn = state.projects.lock_chat(id).await;
            state.projects.update_chat_history(id, Vec::new()).await?
        }
        None => state.scratch_chat.lock().await.clear(),
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::chat::prompts::GENERAL_WELCOME;
    use crate::llm_client::{LlmError, TextService};
    use crate::models::case::CaseDetails;
    use crate::projects::store::MemorySnapshotStore;
    use crate::projects::ProjectManager;

    /// Answers after a delay so concurrent turns overlap.
    struct SlowService;

    #[async_trait]
    impl TextService for SlowService {
        async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn chat(&self, _system: &str, history: &[Message]) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let question = history.last().map(|m| m.text.as_str()).unwrap_or("");
            Ok(format!("回覆：{question}"))
        }
    }

    fn state() -> AppState {
        let projects = Arc::new(ProjectManager::new(Arc::new(
            MemorySnapshotStore::default(),
        )));
        AppState::new(Arc::new(SlowService), projects)
    }

    async fn create_project(state: &AppState, company: &str) -> Uuid {
        let details = CaseDetails {
            company_name: company.to_string(),
            ..Default::default()
        };
        state.projects.save(None, details, None).await.unwrap().id
    }

    async fn chat(state: &AppState, project_id: Option<Uuid>, message: &str) {
        handle_chat(
            State(state.clone()),
            Json(ChatRequest {
                project_id,
                message: message.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    fn texts(history: &[Message]) -> Vec<&str> {
        history.iter().map(|m| m.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_concurrent_project_turns_are_all_kept() {
        let state = state();
        let id = create_project(&state, "大發科技").await;

        tokio::join!(
            chat(&state, Some(id), "問題一"),
            chat(&state, Some(id), "問題二"),
        );

        let history = state.projects.get(id).await.unwrap().chat_history;
        assert_eq!(history.len(), 5);
        let texts = texts(&history);
        assert!(texts.contains(&"問題一"));
        assert!(texts.contains(&"回覆：問題一"));
        assert!(texts.contains(&"問題二"));
        assert!(texts.contains(&"回覆：問題二"));
    }

    #[tokio::test]
    async fn test_clear_waits_for_turn_in_flight() {
        let state = state();
        let id = create_project(&state, "大發科技").await;

        let clear = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle_clear_chat(
                State(state.clone()),
                Query(ProjectQuery {
                    project_id: Some(id),
                }),
            )
            .await
            .unwrap();
        };
        tokio::join!(chat(&state, Some(id), "問題一"), clear);

        assert!(state.projects.get(id).await.unwrap().chat_history.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_scratch_turns_are_all_kept() {
        let state = state();
        tokio::join!(chat(&state, None, "問題一"), chat(&state, None, "問題二"));
        assert_eq!(state.scratch_chat.lock().await.len(), 5);
    }

    #[tokio::test]
    async fn test_blank_company_gets_general_welcome() {
        let state = state();
        let id = create_project(&state, "  ").await;
        chat(&state, Some(id), "問題").await;

        let history = state.projects.get(id).await.unwrap().chat_history;
        assert_eq!(history[0].text, GENERAL_WELCOME);
    }
}
