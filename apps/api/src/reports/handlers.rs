//! Axum route handlers for the report API.

use std::ops::Range;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::case::CaseDetails;
use crate::models::project::ReportProject;
use crate::reports::export::{covers_for_agency, find_placeholders, has_unfilled_placeholders};
use crate::reports::generator::generate_reports;
use crate::routing::Agency;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Project to update; a new one is created when absent.
    pub project_id: Option<Uuid>,
    pub details: CaseDetails,
}

/// Per-letter hints for the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterAnnotations {
    pub agency: Agency,
    /// Byte ranges of `[請在此填寫：...]` markers in the letter body.
    pub body_placeholders: Vec<Range<usize>>,
    /// Evidence cover codes that belong in this agency's bundle.
    pub attachment_codes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub project: ReportProject,
    pub has_unfilled_placeholders: bool,
    pub letters: Vec<LetterAnnotations>,
}

/// POST /api/v1/reports/generate
///
/// Generates the letters and auto-saves the project with the result.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let result = generate_reports(state.llm.as_ref(), &request.details).await?;

    let letters = result
        .present_agencies()
        .into_iter()
        .filter_map(|agency| {
            let report = result.report(agency)?;
            Some(LetterAnnotations {
                agency,
                body_placeholders: find_placeholders(&report.body),
                attachment_codes: covers_for_agency(&result, agency)
                    .into_iter()
                    .map(|c| c.code.clone())
                    .collect(),
            })
        })
        .collect();
    let unfilled = has_unfilled_placeholders(&result);

    let project = state
        .projects
        .save(request.project_id, request.details, Some(result))
        .await?;
    info!(project_id = %project.id, "Reports saved to project");

    Ok(Json(GenerateResponse {
        project,
        has_unfilled_placeholders: unfilled,
        letters,
    }))
}
