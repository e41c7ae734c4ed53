//! Labor-law chat assistant.
//!
//! Conversations are bound to a project when one is active; the project's
//! case facts are folded into the system instruction. Without a project the
//! assistant answers general questions from a shared scratch history.

use tracing::error;

use crate::llm_client::TextService;
use crate::models::case::CaseDetails;
use crate::models::message::Message;
use crate::models::report::ReportResult;

pub mod handlers;
pub mod prompts;

use prompts::{
    CHAT_FAILURE_REPLY, CHAT_SYSTEM_BASE, CHAT_CONTEXT_TEMPLATE, GENERAL_WELCOME,
    PROJECT_WELCOME_TEMPLATE,
};

/// Case facts handed to the assistant, rendered as plain text.
pub fn project_context(details: &CaseDetails, reports: Option<&ReportResult>) -> String {
    let violations = details
        .violations
        .iter()
        .map(|v| v.label())
        .collect::<Vec<_>>()
        .join(", ");

    let mut context = format!("案件公司：{}\n", details.company_name);
    context.push_str(&format!("違法項目：{violations}\n"));
    context.push_str(&format!("案情描述：{}\n", details.description));
    if let Some(reports) = reports {
        context.push_str(&format!(
            "已生成文案預覽：包含 {} 個單位的檢舉信。",
            reports.present_agencies().len()
        ));
    }
    context
}

pub fn system_instruction(context: Option<&str>) -> String {
    match context.filter(|c| !c.trim().is_empty()) {
        Some(context) => format!(
            "{CHAT_SYSTEM_BASE}{}",
            CHAT_CONTEXT_TEMPLATE.replace("{context}", context)
        ),
        None => CHAT_SYSTEM_BASE.to_string(),
    }
}

/// Greeting shown when a conversation has no history yet.
pub fn welcome_message(project_name: Option<&str>) -> Message {
    match project_name {
        Some(name) => Message::model(PROJECT_WELCOME_TEMPLATE.replace("{project_name}", name)),
        None => Message::model(GENERAL_WELCOME),
    }
}

/// Runs one chat turn and returns the updated history.
///
/// An empty history starts from the welcome message. A failed model call is
/// answered with a fixed apology so the conversation stays usable.
pub async fn send_message(
    service: &dyn TextService,
    context: Option<&str>,
    project_name: Option<&str>,
    history: Vec<Message>,
    text: &str,
) -> Vec<Message> {
    let mut history = if history.is_empty() {
        vec![welcome_message(project_name)]
    } else {
        history
    };
    history.push(Message::user(text.trim()));

    let system = system_instruction(context);
    let reply = match service.chat(&system, &history).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Chat error: {e}");
            CHAT_FAILURE_REPLY.to_string()
        }
    };
    history.push(Message::model(reply));
    history
}
