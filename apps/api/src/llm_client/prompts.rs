// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Marker the model must use for any fact missing from the case data.
pub const PLACEHOLDER_PREFIX: &str = "[請在此填寫：";

/// Instruction forbidding invented facts in generated letters.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    【核心指令：未知事實佔位協議 (CRITICAL)】\n\
    若上述資料中缺少關鍵資訊（例如：明確的違法日期、受傷的具體部位、具體被扣金額、具體危險設施名稱等），\n\
    **嚴禁自行編造事實或 Hallucinate (幻覺)**。\n\
    請統一使用「[請在此填寫：(缺失的具體資訊描述)]」作為佔位符。";
