//! Axum route handlers for the routing advisor and the form catalog.
//!
//! Request bodies carry raw identifiers so unknown agencies surface as
//! `InvalidAgency` rather than a generic JSON rejection.

use std::collections::BTreeSet;

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::case::{is_salary_below_minimum, CaseDetails};
use crate::routing::{
    detect_insurance_relevance, insurance_inquiry_needed, relevant_evidence_categories,
    suggest_agencies, toggle_agency, Agency, CaseSelection, EvidenceCategory, Violation,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationOption {
    pub label: &'static str,
    pub insurance_relevant: bool,
}

#[derive(Debug, Serialize)]
pub struct AgencyOption {
    pub id: &'static str,
    pub title: &'static str,
    pub evidence: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct EvidenceOption {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub violations: Vec<ViolationOption>,
    pub agencies: Vec<AgencyOption>,
    pub evidence: Vec<EvidenceOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    #[serde(default)]
    pub violations: Vec<String>,
    pub new_violation: String,
    #[serde(default)]
    pub agencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleAgencyRequest {
    #[serde(default)]
    pub agencies: Vec<String>,
    pub agency: String,
}

#[derive(Debug, Serialize)]
pub struct AgenciesResponse {
    pub agencies: BTreeSet<Agency>,
}

#[derive(Debug, Serialize)]
pub struct EvidenceResponse {
    pub agency: Agency,
    pub categories: BTreeSet<EvidenceCategory>,
}

#[derive(Debug, Deserialize)]
pub struct InsuranceCheckRequest {
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub agencies: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCheckResponse {
    pub insurance_relevant: bool,
    /// Ask the user to confirm the insurance/tax targets.
    pub inquiry_needed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCheckRequest {
    pub monthly_salary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCheckResponse {
    pub below_minimum: bool,
}

/// One form mutation, tagged by `action` on the wire.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CaseEdit {
    ToggleViolation { violation: String },
    ToggleAgency { agency: String },
    ToggleEvidence { code: EvidenceCategory },
    AddEvidenceImage { code: EvidenceCategory, data: String },
    AddEvidenceLink { code: EvidenceCategory, url: String },
    RemoveEvidenceImage { code: EvidenceCategory, index: usize },
    RemoveEvidenceLink { code: EvidenceCategory, index: usize },
}

#[derive(Debug, Deserialize)]
pub struct EditCaseRequest {
    pub details: CaseDetails,
    pub edit: CaseEdit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCaseResponse {
    pub details: CaseDetails,
    pub below_minimum: bool,
    pub inquiry_needed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
pub async fn handle_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        violations: Violation::ALL
            .iter()
            .map(|v| ViolationOption {
                label: v.label(),
                insurance_relevant: v.is_insurance_relevant(),
            })
            .collect(),
        agencies: Agency::ALL
            .iter()
            .map(|a| AgencyOption {
                id: a.id(),
                title: a.title(),
                evidence: a.evidence_categories().iter().map(|c| c.code()).collect(),
            })
            .collect(),
        evidence: EvidenceCategory::ALL
            .iter()
            .map(|c| EvidenceOption {
                code: c.code(),
                label: c.label(),
            })
            .collect(),
    })
}

/// POST /api/v1/routing/suggest
pub async fn handle_suggest(
    Json(request): Json<SuggestRequest>,
) -> Result<Json<AgenciesResponse>, AppError> {
    // Validated for consistency even though the suggestion only looks at the new one
    parse_violations(&request.violations)?;
    let new_violation = parse_violation(&request.new_violation)?;
    let current = parse_agencies(&request.agencies)?;

    Ok(Json(AgenciesResponse {
        agencies: suggest_agencies(new_violation, &current),
    }))
}

/// POST /api/v1/routing/toggle-agency
pub async fn handle_toggle_agency(
    Json(request): Json<ToggleAgencyRequest>,
) -> Result<Json<AgenciesResponse>, AppError> {
    let current = parse_agencies(&request.agencies)?;
    Ok(Json(AgenciesResponse {
        agencies: toggle_agency(&current, &request.agency)?,
    }))
}

/// GET /api/v1/routing/evidence/:agency
pub async fn handle_evidence(Path(agency): Path<String>) -> Result<Json<EvidenceResponse>, AppError> {
    let categories = relevant_evidence_categories(&agency)?;
    Ok(Json(EvidenceResponse {
        agency: agency.parse()?,
        categories,
    }))
}

/// POST /api/v1/routing/insurance-check
pub async fn handle_insurance_check(
    Json(request): Json<InsuranceCheckRequest>,
) -> Result<Json<InsuranceCheckResponse>, AppError> {
    let selection = CaseSelection {
        violations: parse_violations(&request.violations)?,
        agencies: parse_agencies(&request.agencies)?,
        evidence: BTreeSet::new(),
    };
    Ok(Json(InsuranceCheckResponse {
        insurance_relevant: detect_insurance_relevance(&selection.violations),
        inquiry_needed: insurance_inquiry_needed(&selection),
    }))
}

/// POST /api/v1/cases/salary-check
pub async fn handle_salary_check(
    Json(request): Json<SalaryCheckRequest>,
) -> Json<SalaryCheckResponse> {
    Json(SalaryCheckResponse {
        below_minimum: is_salary_below_minimum(&request.monthly_salary),
    })
}

/// POST /api/v1/cases/edit
///
/// Applies one form mutation and returns the updated case with its warnings.
pub async fn handle_edit_case(
    Json(request): Json<EditCaseRequest>,
) -> Result<Json<EditCaseResponse>, AppError> {
    let mut details = request.details;
    match request.edit {
        CaseEdit::ToggleViolation { violation } => {
            details.toggle_violation(parse_violation(&violation)?)
        }
        CaseEdit::ToggleAgency { agency } => details.toggle_agency(agency.parse()?),
        CaseEdit::ToggleEvidence { code } => details.toggle_evidence(code),
        CaseEdit::AddEvidenceImage { code, data } => details.add_evidence_image(code, data),
        CaseEdit::AddEvidenceLink { code, url } => details.add_evidence_link(code, &url),
        CaseEdit::RemoveEvidenceImage { code, index } => {
            details.remove_evidence_image(code, index)
        }
        CaseEdit::RemoveEvidenceLink { code, index } => details.remove_evidence_link(code, index),
    }

    Ok(Json(EditCaseResponse {
        below_minimum: details.is_salary_below_minimum(),
        inquiry_needed: insurance_inquiry_needed(&details.selection()),
        details,
    }))
}

fn parse_violation(label: &str) -> Result<Violation, AppError> {
    Violation::from_label(label)
        .ok_or_else(|| AppError::Validation(format!("Unknown violation: {label}")))
}

fn parse_violations(labels: &[String]) -> Result<BTreeSet<Violation>, AppError> {
    labels.iter().map(|l| parse_violation(l)).collect()
}

fn parse_agencies(ids: &[String]) -> Result<BTreeSet<Agency>, AppError> {
    Ok(ids
        .iter()
        .map(|id| id.parse::<Agency>())
        .collect::<Result<_, _>>()?)
}
