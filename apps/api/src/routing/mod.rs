//! Agency routing. Decides which agencies a case should be reported to and
//! which evidence categories belong in each agency's attachment bundle.
//!
//! Every operation here is a pure function over closed enumerations.
//! The caller owns the working selection; functions return new sets and
//! never mutate their inputs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod handlers;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Invalid agency identifier: {0}")]
    InvalidAgency(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Closed enumerations
// ────────────────────────────────────────────────────────────────────────────

/// The three government bodies a complaint can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Agency {
    LaborInsurance,
    LaborInspection,
    TaxBureau,
}

impl Agency {
    pub const ALL: [Agency; 3] = [
        Agency::LaborInsurance,
        Agency::LaborInspection,
        Agency::TaxBureau,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Agency::LaborInsurance => "laborInsurance",
            Agency::LaborInspection => "laborInspection",
            Agency::TaxBureau => "taxBureau",
        }
    }

    /// Official name used as the letter addressee.
    pub fn title(&self) -> &'static str {
        match self {
            Agency::LaborInsurance => "勞動部勞工保險局",
            Agency::LaborInspection => "各縣市勞動檢查處",
            Agency::TaxBureau => "財政部國稅局",
        }
    }

    /// Evidence categories that belong in this agency's attachment bundle.
    /// The mapping is total and every subset is non-empty.
    pub fn evidence_categories(&self) -> &'static [EvidenceCategory] {
        use EvidenceCategory::*;
        match self {
            Agency::LaborInsurance => &[A, B, C, F],
            Agency::LaborInspection => &[A, B, C, D, E, F],
            Agency::TaxBureau => &[G],
        }
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Agency {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Agency::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| RoutingError::InvalidAgency(s.to_string()))
    }
}

/// Fixed classes of supporting material, coded `A` through `G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvidenceCategory {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl EvidenceCategory {
    pub const ALL: [EvidenceCategory; 7] = [
        EvidenceCategory::A,
        EvidenceCategory::B,
        EvidenceCategory::C,
        EvidenceCategory::D,
        EvidenceCategory::E,
        EvidenceCategory::F,
        EvidenceCategory::G,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EvidenceCategory::A => "A",
            EvidenceCategory::B => "B",
            EvidenceCategory::C => "C",
            EvidenceCategory::D => "D",
            EvidenceCategory::E => "E",
            EvidenceCategory::F => "F",
            EvidenceCategory::G => "G",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvidenceCategory::A => "排班證據 (出勤紀錄/打卡單)",
            EvidenceCategory::B => "薪資證據 (轉帳紀錄/薪資條)",
            EvidenceCategory::C => "指揮監督 (Line對話/派工單)",
            EvidenceCategory::D => "危險作業 (現場照片/職安缺失)",
            EvidenceCategory::E => "勞務報酬 (勞務報酬單/合約)",
            EvidenceCategory::F => "通信紀錄 (Email/存證信函)",
            EvidenceCategory::G => "所得性質 (所得性質確認申請書)",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        EvidenceCategory::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// Known labor-law violation categories, identified on the wire by their label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Violation {
    #[serde(rename = "高薪低報 (勞保/健保/勞退)")]
    UnderReportedInsuredWage,
    #[serde(rename = "未投保 (勞保/健保/就保)")]
    NotInsured,
    #[serde(rename = "未給付加班費")]
    UnpaidOvertime,
    #[serde(rename = "工資未全額給付/預扣工資")]
    WagesWithheld,
    #[serde(rename = "超時工作/違反七休一")]
    ExcessiveHours,
    #[serde(rename = "未給予例假/國定假日/特休")]
    LeaveDenied,
    #[serde(rename = "違法解僱/未給付資遣費")]
    UnlawfulDismissal,
    #[serde(rename = "職安衛設施不足/危險工作環境")]
    UnsafeWorkplace,
    #[serde(rename = "薪資所得扣繳憑單不實 (逃漏稅)")]
    FalseWithholdingStatement,
}

impl Violation {
    pub const ALL: [Violation; 9] = [
        Violation::UnderReportedInsuredWage,
        Violation::NotInsured,
        Violation::UnpaidOvertime,
        Violation::WagesWithheld,
        Violation::ExcessiveHours,
        Violation::LeaveDenied,
        Violation::UnlawfulDismissal,
        Violation::UnsafeWorkplace,
        Violation::FalseWithholdingStatement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Violation::UnderReportedInsuredWage => "高薪低報 (勞保/健保/勞退)",
            Violation::NotInsured => "未投保 (勞保/健保/就保)",
            Violation::UnpaidOvertime => "未給付加班費",
            Violation::WagesWithheld => "工資未全額給付/預扣工資",
            Violation::ExcessiveHours => "超時工作/違反七休一",
            Violation::LeaveDenied => "未給予例假/國定假日/特休",
            Violation::UnlawfulDismissal => "違法解僱/未給付資遣費",
            Violation::UnsafeWorkplace => "職安衛設施不足/危險工作環境",
            Violation::FalseWithholdingStatement => "薪資所得扣繳憑單不實 (逃漏稅)",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Violation::ALL.into_iter().find(|v| v.label() == label)
    }

    /// Whether this violation touches insurance premiums, pension
    /// contributions or tax declarations. A static attribute, not a
    /// label heuristic.
    pub fn is_insurance_relevant(&self) -> bool {
        matches!(
            self,
            Violation::UnderReportedInsuredWage
                | Violation::NotInsured
                | Violation::FalseWithholdingStatement
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Working selection
// ────────────────────────────────────────────────────────────────────────────

/// The violations, agencies and evidence chosen for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSelection {
    pub violations: BTreeSet<Violation>,
    pub agencies: BTreeSet<Agency>,
    pub evidence: BTreeSet<EvidenceCategory>,
}

impl CaseSelection {
    /// Toggles a violation. Turning one on also applies the agency suggestion;
    /// turning one off never touches the agency set.
    pub fn toggle_violation(&self, violation: Violation) -> CaseSelection {
        let mut next = self.clone();
        if next.violations.remove(&violation) {
            return next;
        }
        next.violations.insert(violation);
        next.agencies = suggest_agencies(violation, &self.agencies);
        next
    }

    pub fn toggle_agency(&self, agency: Agency) -> CaseSelection {
        CaseSelection {
            agencies: toggle(&self.agencies, agency),
            ..self.clone()
        }
    }

    pub fn toggle_evidence(&self, category: EvidenceCategory) -> CaseSelection {
        CaseSelection {
            evidence: toggle(&self.evidence, category),
            ..self.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Advisor operations
// ────────────────────────────────────────────────────────────────────────────

/// Suggests agencies for a newly selected violation.
///
/// An insurance-relevant violation adds `laborInsurance` and `taxBureau`
/// (idempotent union). Anything else returns the agencies unchanged.
/// Never removes an agency. Violations already selected do not affect the
/// result, so they are not taken.
pub fn suggest_agencies(
    newly_added: Violation,
    current_agencies: &BTreeSet<Agency>,
) -> BTreeSet<Agency> {
    let mut agencies = current_agencies.clone();
    if newly_added.is_insurance_relevant() {
        agencies.insert(Agency::LaborInsurance);
        agencies.insert(Agency::TaxBureau);
    }
    agencies
}

/// Adds the agency if absent, removes it if present.
pub fn toggle_agency(
    current_agencies: &BTreeSet<Agency>,
    agency: &str,
) -> Result<BTreeSet<Agency>, RoutingError> {
    let agency: Agency = agency.parse()?;
    Ok(toggle(current_agencies, agency))
}

pub fn relevant_evidence_categories(
    agency: &str,
) -> Result<BTreeSet<EvidenceCategory>, RoutingError> {
    let agency: Agency = agency.parse()?;
    Ok(agency.evidence_categories().iter().copied().collect())
}

pub fn detect_insurance_relevance<'a, I>(violations: I) -> bool
where
    I: IntoIterator<Item = &'a Violation>,
{
    violations.into_iter().any(Violation::is_insurance_relevant)
}

/// True when the user targets the insurance bureau or the tax bureau but has
/// not selected any violation that justifies it. Surfaced as a confirmation
/// prompt, never auto-corrected.
pub fn insurance_inquiry_needed(selection: &CaseSelection) -> bool {
    let requests_insurance = selection.agencies.contains(&Agency::LaborInsurance)
        || selection.agencies.contains(&Agency::TaxBureau);
    requests_insurance && !detect_insurance_relevance(&selection.violations)
}

fn toggle<T: Ord + Copy>(set: &BTreeSet<T>, item: T) -> BTreeSet<T> {
    let mut next = set.clone();
    if !next.remove(&item) {
        next.insert(item);
    }
    next
}
