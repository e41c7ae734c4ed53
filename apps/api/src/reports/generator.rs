//! Report generation: turns a case into complaint letters.
//!
//! Flow: validate case → build prompt → TextService (structured JSON) →
//!       parse → drop letters for agencies the user did not target →
//!       attach the case's evidence images and links.

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::NO_FABRICATION_INSTRUCTION;
use crate::llm_client::{strip_json_fences, LlmError, TextService};
use crate::models::case::{CaseDetails, MIN_HOURLY_WAGE, MIN_MONTHLY_WAGE};
use crate::models::report::{EvidenceCover, GeneratedReport, ReportResult};
use crate::reports::prompts::{
    report_response_schema, CLOUD_LINK_SUFFIX, REPORT_PROMPT_TEMPLATE, UNKNOWN_COMPANY_ID,
};
use crate::routing::Agency;

/// The JSON object the model is asked to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelLetters {
    #[serde(default)]
    labor_insurance: Option<GeneratedReport>,
    #[serde(default)]
    labor_inspection: Option<GeneratedReport>,
    #[serde(default)]
    tax_bureau: Option<GeneratedReport>,
    #[serde(default)]
    evidence_covers: Vec<EvidenceCover>,
}

/// Runs the generation pipeline for one case.
pub async fn generate_reports(
    service: &dyn TextService,
    details: &CaseDetails,
) -> Result<ReportResult, AppError> {
    validate_case(details)?;

    let prompt = build_report_prompt(details);
    info!(
        company = %details.company_name,
        agencies = details.target_agencies.len(),
        "Generating complaint letters"
    );

    let raw = service
        .generate_json(&prompt, &report_response_schema())
        .await
        .map_err(|e| AppError::Llm(format!("Report generation failed: {e}")))?;

    let result = parse_report_response(&raw, details)?;
    info!(
        company = %details.company_name,
        letters = result.present_agencies().len(),
        covers = result.evidence_covers.len(),
        "Complaint letters generated"
    );
    Ok(result)
}

fn validate_case(details: &CaseDetails) -> Result<(), AppError> {
    if details.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "companyName cannot be empty".to_string(),
        ));
    }
    if details.target_agencies.is_empty() {
        return Err(AppError::Validation(
            "Select at least one target agency".to_string(),
        ));
    }
    Ok(())
}

/// Parses the model output and applies the case's agency selection.
pub fn parse_report_response(raw: &str, details: &CaseDetails) -> Result<ReportResult, AppError> {
    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(AppError::Llm(LlmError::EmptyContent.to_string()));
    }

    let letters: ModelLetters = serde_json::from_str(text)
        .map_err(|e| AppError::Llm(format!("Report response was not valid JSON: {e}")))?;

    let mut result = ReportResult {
        labor_insurance: letters.labor_insurance,
        labor_inspection: letters.labor_inspection,
        tax_bureau: letters.tax_bureau,
        evidence_covers: letters.evidence_covers,
        evidence_images: details.evidence_images.clone(),
        evidence_links: details.evidence_links.clone(),
    };

    for agency in Agency::ALL {
        if !details.target_agencies.contains(&agency) {
            let slot = result.report_slot(agency);
            if slot.take().is_some() {
                warn!("Model wrote a letter for untargeted agency {agency}, dropped");
            }
        }
    }

    Ok(result)
}

/// Fills the report prompt template from the case details.
pub fn build_report_prompt(details: &CaseDetails) -> String {
    let company_id = details
        .company_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_COMPANY_ID);

    let violations = details
        .violations
        .iter()
        .map(|v| v.label())
        .collect::<Vec<_>>()
        .join(", ");

    let evidence = details
        .evidence_selected
        .iter()
        .map(|category| {
            let mut label = format!("附件{}: {}", category.code(), category.label());
            if details.has_links(*category) {
                label.push_str(CLOUD_LINK_SUFFIX);
            }
            label
        })
        .collect::<Vec<_>>()
        .join(", ");

    let agencies = details
        .target_agencies
        .iter()
        .map(|a| format!("- {} ({})", a.id(), a.title()))
        .collect::<Vec<_>>()
        .join("\n");

    REPORT_PROMPT_TEMPLATE
        .replace("{no_fabrication_instruction}", NO_FABRICATION_INSTRUCTION)
        .replace("{company_id}", company_id)
        .replace("{employment_start_date}", &details.employment_start_date)
        .replace("{incident_date}", &details.incident_date)
        .replace("{monthly_salary}", &details.monthly_salary)
        .replace("{min_hourly}", &MIN_HOURLY_WAGE.to_string())
        .replace("{min_monthly}", &MIN_MONTHLY_WAGE.to_string())
        .replace("{violations}", &violations)
        .replace("{evidence}", &evidence)
        .replace(
            "{dangerous}",
            if details.is_dangerous_environment {
                "是"
            } else {
                "否"
            },
        )
        .replace("{agencies}", &agencies)
        // Free text goes in last so template markers inside it survive
        .replace("{company_name}", &details.company_name)
        .replace("{description}", &details.description)
}
