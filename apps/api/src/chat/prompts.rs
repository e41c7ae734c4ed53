// Prompt and canned-reply constants for the chat assistant.

pub const CHAT_SYSTEM_BASE: &str =
    "你是一位精通台灣勞動法律的 AI 助手。嚴格遵守事實，若資訊不足請提示使用者補充，不要編造。";

/// Appended to the system instruction when a project is active.
/// Replace `{context}` before sending.
pub const CHAT_CONTEXT_TEMPLATE: &str = "\n\n【目前參考專案上下文】\n{context}\n\n\
    請根據以上專案資料回答使用者的問題。如果使用者詢問有關此案件的建議，請結合上述資料給予具體分析。";

/// Replace `{project_name}` before use.
pub const PROJECT_WELCOME_TEMPLATE: &str = "您好！我是您的勞權 AI 助手。我已成功載入「{project_name}」的專案資料作為背景知識。\
    您可以直接詢問有關此案件的細節、法律分析或文案修改建議。";

pub const GENERAL_WELCOME: &str = "您好！我是您的勞權 AI 助手。您可以先點選「我的專案」載入案件，\
    或直接在這裡向我諮詢一般的勞資問題。請問有什麼我可以幫您的？";

pub const CHAT_FAILURE_REPLY: &str = "抱歉，目前連線出現問題或無法回覆該內容，請稍後再試。";
