use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::routing::{Agency, CaseSelection, EvidenceCategory, Violation};

/// 2025 statutory minimum hourly wage (NTD).
pub const MIN_HOURLY_WAGE: i64 = 190;
/// 2025 statutory minimum monthly wage (NTD).
pub const MIN_MONTHLY_WAGE: i64 = 28_590;
/// Values at or above this are read as monthly salaries, below as hourly.
const MONTHLY_SALARY_FLOOR: i64 = 500;

/// Everything the user entered about one labor dispute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetails {
    pub company_name: String,
    /// 統一編號
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub incident_date: String,
    #[serde(default)]
    pub employment_start_date: String,
    #[serde(default)]
    pub monthly_salary: String,
    #[serde(default)]
    pub is_dangerous_environment: bool,
    #[serde(default)]
    pub violations: BTreeSet<Violation>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_target_agencies")]
    pub target_agencies: BTreeSet<Agency>,
    #[serde(default)]
    pub evidence_selected: BTreeSet<EvidenceCategory>,
    /// Data-URL encoded images per evidence category.
    #[serde(default)]
    pub evidence_images: BTreeMap<EvidenceCategory, Vec<String>>,
    /// Cloud drive links per evidence category.
    #[serde(default)]
    pub evidence_links: BTreeMap<EvidenceCategory, Vec<String>>,
}

fn default_target_agencies() -> BTreeSet<Agency> {
    [Agency::LaborInspection].into_iter().collect()
}

impl Default for CaseDetails {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            company_id: None,
            incident_date: String::new(),
            employment_start_date: String::new(),
            monthly_salary: String::new(),
            is_dangerous_environment: false,
            violations: BTreeSet::new(),
            description: String::new(),
            target_agencies: default_target_agencies(),
            evidence_selected: BTreeSet::new(),
            evidence_images: BTreeMap::new(),
            evidence_links: BTreeMap::new(),
        }
    }
}

impl CaseDetails {
    pub fn selection(&self) -> CaseSelection {
        CaseSelection {
            violations: self.violations.clone(),
            agencies: self.target_agencies.clone(),
            evidence: self.evidence_selected.clone(),
        }
    }

    fn apply(&mut self, selection: CaseSelection) {
        self.violations = selection.violations;
        self.target_agencies = selection.agencies;
        self.evidence_selected = selection.evidence;
    }

    pub fn toggle_violation(&mut self, violation: Violation) {
        let next = self.selection().toggle_violation(violation);
        self.apply(next);
    }

    pub fn toggle_agency(&mut self, agency: Agency) {
        let next = self.selection().toggle_agency(agency);
        self.apply(next);
    }

    pub fn toggle_evidence(&mut self, category: EvidenceCategory) {
        let next = self.selection().toggle_evidence(category);
        self.apply(next);
    }

    /// Attaching material to a category also selects it.
    pub fn add_evidence_image(&mut self, category: EvidenceCategory, data_url: String) {
        self.evidence_selected.insert(category);
        self.evidence_images
            .entry(category)
            .or_default()
            .push(data_url);
    }

    /// Blank links are ignored.
    pub fn add_evidence_link(&mut self, category: EvidenceCategory, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        self.evidence_selected.insert(category);
        self.evidence_links
            .entry(category)
            .or_default()
            .push(url.to_string());
    }

    pub fn remove_evidence_image(&mut self, category: EvidenceCategory, index: usize) {
        remove_at(&mut self.evidence_images, category, index);
    }

    pub fn remove_evidence_link(&mut self, category: EvidenceCategory, index: usize) {
        remove_at(&mut self.evidence_links, category, index);
    }

    pub fn has_links(&self, category: EvidenceCategory) -> bool {
        self.evidence_links
            .get(&category)
            .is_some_and(|links| !links.is_empty())
    }

    pub fn is_salary_below_minimum(&self) -> bool {
        is_salary_below_minimum(&self.monthly_salary)
    }
}

fn remove_at(
    map: &mut BTreeMap<EvidenceCategory, Vec<String>>,
    category: EvidenceCategory,
    index: usize,
) {
    if let Some(items) = map.get_mut(&category) {
        if index < items.len() {
            items.remove(index);
        }
    }
}

/// Checks a free-text salary against the statutory minimum.
///
/// Commas are stripped and the leading integer is read. Small values are
/// treated as hourly wages, larger ones as monthly. Unparseable input is
/// never flagged.
pub fn is_salary_below_minimum(salary: &str) -> bool {
    let Some(value) = parse_leading_int(&salary.replace(',', "")) else {
        return false;
    };
    (value > 0 && value < MIN_HOURLY_WAGE)
        || (value >= MONTHLY_SALARY_FLOOR && value < MIN_MONTHLY_WAGE)
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|v| sign * v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_case_targets_labor_inspection() {
        let case = CaseDetails::default();
        assert_eq!(case.target_agencies, BTreeSet::from([Agency::LaborInspection]));
    }

    #[test]
    fn test_missing_agencies_default_on_deserialize() {
        let case: CaseDetails = serde_json::from_value(serde_json::json!({
            "companyName": "大發科技"
        }))
        .unwrap();
        assert!(case.target_agencies.contains(&Agency::LaborInspection));
        assert!(case.company_id.is_none());
    }

    #[test]
    fn test_camel_case_round_trip_fields() {
        let mut case = CaseDetails {
            company_name: "大發科技".to_string(),
            ..Default::default()
        };
        case.add_evidence_link(EvidenceCategory::B, "https://drive.example/x");
        let value = serde_json::to_value(&case).unwrap();
        assert_eq!(value["companyName"], "大發科技");
        assert_eq!(value["targetAgencies"][0], "laborInspection");
        assert_eq!(value["evidenceLinks"]["B"][0], "https://drive.example/x");
    }

    #[test]
    fn test_toggle_violation_suggests_agencies() {
        let mut case = CaseDetails::default();
        case.toggle_violation(Violation::FalseWithholdingStatement);
        assert_eq!(case.target_agencies.len(), 3);
    }

    #[test]
    fn test_adding_evidence_selects_category() {
        let mut case = CaseDetails::default();
        case.add_evidence_image(EvidenceCategory::D, "data:image/jpeg;base64,AAA".to_string());
        assert!(case.evidence_selected.contains(&EvidenceCategory::D));
        assert_eq!(case.evidence_images[&EvidenceCategory::D].len(), 1);
    }

    #[test]
    fn test_blank_link_is_ignored() {
        let mut case = CaseDetails::default();
        case.add_evidence_link(EvidenceCategory::A, "   ");
        assert!(case.evidence_selected.is_empty());
        assert!(!case.has_links(EvidenceCategory::A));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut case = CaseDetails::default();
        case.add_evidence_link(EvidenceCategory::F, "https://a");
        case.add_evidence_link(EvidenceCategory::F, "https://b");
        case.remove_evidence_link(EvidenceCategory::F, 5);
        assert_eq!(case.evidence_links[&EvidenceCategory::F].len(), 2);
        case.remove_evidence_link(EvidenceCategory::F, 0);
        assert_eq!(case.evidence_links[&EvidenceCategory::F], vec!["https://b"]);
        case.remove_evidence_image(EvidenceCategory::G, 0);
        assert!(case.evidence_images.is_empty());
    }

    #[test]
    fn test_salary_thresholds() {
        assert!(is_salary_below_minimum("150"));
        assert!(is_salary_below_minimum("25,000"));
        assert!(!is_salary_below_minimum("190"));
        assert!(!is_salary_below_minimum("28590"));
        assert!(!is_salary_below_minimum("32,000"));
        // Between the hourly and monthly ranges is ambiguous, so not flagged
        assert!(!is_salary_below_minimum("300"));
        assert!(!is_salary_below_minimum("0"));
        assert!(!is_salary_below_minimum("面議"));
        assert!(!is_salary_below_minimum(""));
    }

    #[test]
    fn test_salary_with_trailing_text() {
        assert!(is_salary_below_minimum("26000元"));
    }
}
