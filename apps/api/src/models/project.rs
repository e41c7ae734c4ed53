use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::case::CaseDetails;
use crate::models::message::Message;
use crate::models::report::ReportResult;

/// Name given to a project whose case has no company name yet.
pub const UNNAMED_PROJECT: &str = "未命名專案";

/// A saved complaint case with its generated letters and chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProject {
    pub id: Uuid,
    pub name: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    pub data: CaseDetails,
    pub reports: Option<ReportResult>,
    #[serde(default)]
    pub chat_history: Vec<Message>,
}

/// Listing view that leaves out the heavy case payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub has_reports: bool,
}

impl From<&ReportProject> for ProjectSummary {
    fn from(project: &ReportProject) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            created_at: project.created_at,
            updated_at: project.updated_at,
            has_reports: project.reports.is_some(),
        }
    }
}
