use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::{Agency, EvidenceCategory};

/// One complaint letter addressed to a single agency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Attachment suggestions written by the model.
    #[serde(default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub submission_guide: String,
}

/// Cover sheet text for one evidence attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceCover {
    /// Evidence code `A`..`G`. Kept as text since the model may return
    /// codes outside the known set; those are simply never matched.
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl EvidenceCover {
    pub fn category(&self) -> Option<EvidenceCategory> {
        EvidenceCategory::from_code(self.code.trim())
    }
}

/// The full set of generated letters for a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub labor_insurance: Option<GeneratedReport>,
    pub labor_inspection: Option<GeneratedReport>,
    pub tax_bureau: Option<GeneratedReport>,
    #[serde(default)]
    pub evidence_covers: Vec<EvidenceCover>,
    #[serde(default)]
    pub evidence_images: BTreeMap<EvidenceCategory, Vec<String>>,
    #[serde(default)]
    pub evidence_links: BTreeMap<EvidenceCategory, Vec<String>>,
}

impl ReportResult {
    pub fn report(&self, agency: Agency) -> Option<&GeneratedReport> {
        match agency {
            Agency::LaborInsurance => self.labor_insurance.as_ref(),
            Agency::LaborInspection => self.labor_inspection.as_ref(),
            Agency::TaxBureau => self.tax_bureau.as_ref(),
        }
    }

    pub fn report_slot(&mut self, agency: Agency) -> &mut Option<GeneratedReport> {
        match agency {
            Agency::LaborInsurance => &mut self.labor_insurance,
            Agency::LaborInspection => &mut self.labor_inspection,
            Agency::TaxBureau => &mut self.tax_bureau,
        }
    }

    /// Agencies with a letter, in display order.
    pub fn present_agencies(&self) -> Vec<Agency> {
        Agency::ALL
            .into_iter()
            .filter(|a| self.report(*a).is_some())
            .collect()
    }
}
