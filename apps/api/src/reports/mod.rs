// Complaint letter generation and export.
// All LLM calls go through llm_client, never straight to Gemini.

pub mod export;
pub mod generator;
pub mod handlers;
pub mod prompts;
