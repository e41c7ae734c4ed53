// All LLM prompt constants for the report module.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

/// Complaint letter prompt template.
/// Replace: {company_name}, {company_id}, {monthly_salary}, {min_hourly}, {min_monthly},
///          {violations}, {description}, {evidence}, {dangerous}, {agencies},
///          {no_fabrication_instruction}
pub const REPORT_PROMPT_TEMPLATE: &str = r#"你是一位專業的台灣勞動法律顧問。請根據以下資料撰寫正式檢舉信。

【案件資料】
- 公司：{company_name} (統編: {company_id})
- 到職日：{employment_start_date}
- 事發日：{incident_date}
- 薪資：{monthly_salary} (2025 法定：時薪{min_hourly} / 月薪{min_monthly})
- 違法事實：{violations}
- 具體經過：{description}
- 證據：{evidence}
- 職安環境危險：{dangerous}

【目標單位】
{agencies}

{no_fabrication_instruction}

【撰寫規範】
1. 勞檢處：若薪資低於法定標準，必須引用《勞基法》第 21 條。若職安開關為「否」，嚴禁提及職安法。
2. 勞保局：專注於保費、勞退金扣繳不實。
3. 國稅局：專注於薪資扣繳憑單金額與實領不符之逃稅行為。
4. 只為【目標單位】撰寫檢舉信，其餘單位請回傳 null。
5. 為每一項證據附件撰寫封面說明 (evidenceCovers)，code 使用附件代碼。

請以 JSON 格式回傳。"#;

/// Shown in place of the company id when the user left it blank.
pub const UNKNOWN_COMPANY_ID: &str = "未知";

/// Appended to an evidence label when cloud links were attached.
pub const CLOUD_LINK_SUFFIX: &str = " (包含雲端連結)";

fn letter_schema() -> Value {
    json!({
        "type": "OBJECT",
        "nullable": true,
        "properties": {
            "subject": { "type": "STRING" },
            "body": { "type": "STRING" },
            "requiredDocuments": { "type": "ARRAY", "items": { "type": "STRING" } },
            "submissionGuide": { "type": "STRING" }
        }
    })
}

/// Gemini structured-output schema for the letter bundle.
pub fn report_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "laborInsurance": letter_schema(),
            "laborInspection": letter_schema(),
            "taxBureau": letter_schema(),
            "evidenceCovers": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "code": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            }
        }
    })
}
