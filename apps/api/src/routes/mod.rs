pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::projects::handlers as projects;
use crate::reports::handlers as reports;
use crate::routing::handlers as routing;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form catalog and routing advisor
        .route("/api/v1/catalog", get(routing::handle_catalog))
        .route("/api/v1/routing/suggest", post(routing::handle_suggest))
        .route(
            "/api/v1/routing/toggle-agency",
            post(routing::handle_toggle_agency),
        )
        .route(
            "/api/v1/routing/evidence/:agency",
            get(routing::handle_evidence),
        )
        .route(
            "/api/v1/routing/insurance-check",
            post(routing::handle_insurance_check),
        )
        .route(
            "/api/v1/cases/salary-check",
            post(routing::handle_salary_check),
        )
        .route("/api/v1/cases/edit", post(routing::handle_edit_case))
        // Projects
        .route(
            "/api/v1/projects",
            get(projects::handle_list_projects).post(projects::handle_save_project),
        )
        .route(
            "/api/v1/projects/:id",
            get(projects::handle_get_project).delete(projects::handle_delete_project),
        )
        .route(
            "/api/v1/projects/:id/export",
            get(projects::handle_export_project),
        )
        // Reports
        .route("/api/v1/reports/generate", post(reports::handle_generate))
        // Chat
        .route(
            "/api/v1/chat",
            post(chat::handle_chat).delete(chat::handle_clear_chat),
        )
        .with_state(state)
}
