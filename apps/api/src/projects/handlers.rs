//! Axum route handlers for saved projects.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::case::CaseDetails;
use crate::models::project::{ProjectSummary, ReportProject};
use crate::models::report::ReportResult;
use crate::reports::export::{export_file_name, render_text_package};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProjectRequest {
    /// Absent to create a new project.
    pub project_id: Option<Uuid>,
    pub details: CaseDetails,
    pub reports: Option<ReportResult>,
}

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>, AppError> {
    let projects = state.projects.list().await?;
    Ok(Json(projects.iter().map(ProjectSummary::from).collect()))
}

/// POST /api/v1/projects
pub async fn handle_save_project(
    State(state): State<AppState>,
    Json(request): Json<SaveProjectRequest>,
) -> Result<Json<ReportProject>, AppError> {
    let project = state
        .projects
        .save(request.project_id, request.details, request.reports)
        .await?;
    Ok(Json(project))
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportProject>, AppError> {
    Ok(Json(state.projects.get(id).await?))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/:id/export
///
/// Returns the plain-text letter package as a download.
pub async fn handle_export_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let project = state.projects.get(id).await?;
    let reports = project
        .reports
        .ok_or_else(|| AppError::NotFound(format!("Project {id} has no generated reports")))?;

    let now = Local::now();
    let body = render_text_package(&reports, now);
    let file_name = export_file_name(now.date_naive());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"triguard-report.txt\"; filename*=UTF-8''{}",
                    percent_encode(&file_name)
                ),
            ),
        ],
        body,
    )
        .into_response())
}

/// RFC 5987 encoding for the non-ASCII download name.
fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_encode_keeps_ascii() {
        assert_eq!(percent_encode("report_2025-01-01.txt"), "report_2025-01-01.txt");
        assert_eq!(percent_encode("勞"), "%E5%8B%9E");
    }
}
