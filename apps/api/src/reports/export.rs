//! Plain-text export of a generated report package, plus the helpers the
//! viewer needs: placeholder spans and per-agency attachment covers.

use std::ops::Range;

use chrono::{DateTime, Local, NaiveDate};

use crate::llm_client::prompts::PLACEHOLDER_PREFIX;
use crate::models::report::{EvidenceCover, GeneratedReport, ReportResult};
use crate::routing::Agency;

const RULE_DOUBLE: &str =
    "================================================================================";
const RULE_HASH: &str =
    "################################################################################";
const RULE_DASH: &str =
    "--------------------------------------------------------------------------------";
const PACKAGE_TITLE: &str =
    "         勞權三線守護基地 - 完整檢舉文案包 (Tri-Guard Report Package)           ";

/// File name for the downloaded package, dated by generation day.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("勞權三線守護_檢舉文案_{}.txt", date.format("%Y-%m-%d"))
}

/// Renders every present letter into one text document, in agency order.
pub fn render_text_package(result: &ReportResult, generated_at: DateTime<Local>) -> String {
    let mut content = String::new();
    content.push_str(RULE_DOUBLE);
    content.push('\n');
    content.push_str(PACKAGE_TITLE);
    content.push('\n');
    content.push_str(RULE_DOUBLE);
    content.push('\n');
    content.push_str(&format!(
        "生成時間：{}\n",
        generated_at.format("%Y/%m/%d %H:%M:%S")
    ));
    content.push_str(RULE_DOUBLE);
    content.push_str("\n\n");

    for agency in Agency::ALL {
        if let Some(report) = result.report(agency) {
            push_report(&mut content, agency.title(), report);
        }
    }

    content
}

fn push_report(content: &mut String, title: &str, report: &GeneratedReport) {
    content.push_str(RULE_HASH);
    content.push('\n');
    content.push_str(&format!("【 單位：{title} 】\n"));
    content.push_str(RULE_HASH);
    content.push_str("\n\n");
    content.push_str(&format!(">> 投遞指引：\n{}\n\n", report.submission_guide));
    content.push_str(">> 建議附件清單：\n");
    for doc in &report.required_documents {
        content.push_str(&format!("- {doc}\n"));
    }
    content.push_str(&format!("\n>> 信件主旨：\n{}\n\n", report.subject));
    content.push_str(">> 信件正文內容：\n");
    content.push_str(RULE_DASH);
    content.push('\n');
    content.push_str(&report.body);
    content.push('\n');
    content.push_str(RULE_DASH);
    content.push_str("\n\n\n");
}

/// Byte ranges of every `[請在此填寫：...]` placeholder in `text`.
/// An unterminated marker is not a placeholder.
pub fn find_placeholders(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(PLACEHOLDER_PREFIX) {
        let start = cursor + offset;
        let body_start = start + PLACEHOLDER_PREFIX.len();
        let Some(close) = text[body_start..].find(']') else {
            break;
        };
        // An empty description is not a placeholder
        if close == 0 {
            cursor = body_start;
            continue;
        }
        let end = body_start + close + 1;
        spans.push(start..end);
        cursor = end;
    }
    spans
}

/// True when any letter body still carries an unfilled placeholder.
pub fn has_unfilled_placeholders(result: &ReportResult) -> bool {
    Agency::ALL
        .into_iter()
        .filter_map(|a| result.report(a))
        .any(|r| r.body.contains(PLACEHOLDER_PREFIX.trim_end_matches('：')))
}

/// Evidence covers that belong in the given agency's attachment bundle.
pub fn covers_for_agency(result: &ReportResult, agency: Agency) -> Vec<&EvidenceCover> {
    let allowed = agency.evidence_categories();
    result
        .evidence_covers
        .iter()
        .filter(|cover| cover.category().is_some_and(|c| allowed.contains(&c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn letter(subject: &str, body: &str) -> GeneratedReport {
        GeneratedReport {
            subject: subject.to_string(),
            body: body.to_string(),
            required_documents: vec!["薪資條".to_string(), "勞保投保明細".to_string()],
            submission_guide: "線上申辦".to_string(),
        }
    }

    fn cover(code: &str) -> EvidenceCover {
        EvidenceCover {
            code: code.to_string(),
            title: format!("附件{code}"),
            description: String::new(),
        }
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "勞權三線守護_檢舉文案_2025-03-07.txt");
    }

    #[test]
    fn test_package_lists_present_letters_in_agency_order() {
        let result = ReportResult {
            tax_bureau: Some(letter("逃漏稅檢舉", "扣繳憑單不實")),
            labor_insurance: Some(letter("高薪低報檢舉", "投保薪資不實")),
            ..Default::default()
        };
        let at = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        let text = render_text_package(&result, at);

        assert!(text.contains("生成時間：2025/03/07 14:05:09"));
        let insurance = text.find("【 單位：勞動部勞工保險局 】").unwrap();
        let tax = text.find("【 單位：財政部國稅局 】").unwrap();
        assert!(insurance < tax);
        assert!(!text.contains("各縣市勞動檢查處"));
        assert!(text.contains("- 勞保投保明細\n"));
        assert!(text.contains(">> 信件主旨：\n逃漏稅檢舉\n"));
    }

    #[test]
    fn test_empty_result_renders_header_only() {
        let at = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let text = render_text_package(&ReportResult::default(), at);
        assert!(text.contains("Tri-Guard Report Package"));
        assert!(!text.contains("【 單位："));
    }

    #[test]
    fn test_find_placeholders() {
        let text = "於[請在此填寫：日期]遭解僱，扣薪[請在此填寫：金額]元";
        let spans = find_placeholders(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[0].clone()], "[請在此填寫：日期]");
        assert_eq!(&text[spans[1].clone()], "[請在此填寫：金額]");
    }

    #[test]
    fn test_unterminated_or_empty_placeholder_is_ignored() {
        assert!(find_placeholders("[請在此填寫：日期").is_empty());
        assert!(find_placeholders("[請在此填寫：]").is_empty());
        assert!(find_placeholders("沒有佔位符").is_empty());
    }

    #[test]
    fn test_has_unfilled_placeholders() {
        let mut result = ReportResult {
            labor_inspection: Some(letter("s", "完整內容")),
            ..Default::default()
        };
        assert!(!has_unfilled_placeholders(&result));
        result.tax_bureau = Some(letter("s", "金額為[請在此填寫：金額]"));
        assert!(has_unfilled_placeholders(&result));
    }

    #[test]
    fn test_covers_filtered_by_agency() {
        let result = ReportResult {
            evidence_covers: vec![cover("A"), cover("D"), cover("G"), cover("Z")],
            ..Default::default()
        };
        let codes = |agency| {
            covers_for_agency(&result, agency)
                .into_iter()
                .map(|c| c.code.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(codes(Agency::TaxBureau), vec!["G"]);
        assert_eq!(codes(Agency::LaborInsurance), vec!["A"]);
        assert_eq!(codes(Agency::LaborInspection), vec!["A", "D"]);
    }
}
