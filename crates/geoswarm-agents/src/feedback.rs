//! Feedback acknowledgment: a one-paragraph reply from the orchestrator
//! persona to a user message submitted mid-campaign.

use geoswarm_llm::LlmClient;

use crate::error::AgentError;

const SYSTEM_PROMPT: &str = "You are the campaign orchestrator replying to the user who launched \
     this campaign. Acknowledge their message in one short paragraph: confirm what you heard, \
     relate it to the campaign, and say what happens next. Do not promise changes to work that \
     is already in flight.";

/// Canned reply used by callers when acknowledgment generation fails. The
/// fallback is deliberate and visible, never a silent drop.
pub const FALLBACK_ACK: &str = "Thanks for the note — I've recorded your message on the campaign \
     timeline. The current run continues as planned; your feedback will be visible alongside the \
     generated content.";

fn build_prompt(goal: &str, strategy: Option<&str>, message: &str) -> String {
    let strategy_context = strategy.map_or_else(String::new, |s| format!("\nSTRATEGY: {s}"));
    format!("CAMPAIGN GOAL: {goal}{strategy_context}\n\nUSER MESSAGE: {message}")
}

/// Generate the acknowledgment text. Callers decide what to do on failure
/// (the worker falls back to [`FALLBACK_ACK`]).
///
/// # Errors
///
/// Returns [`AgentError::Llm`] if the completion call fails.
pub async fn acknowledge_feedback(
    llm: &LlmClient,
    goal: &str,
    strategy: Option<&str>,
    message: &str,
) -> Result<String, AgentError> {
    let prompt = build_prompt(goal, strategy, message);
    Ok(llm.chat(SYSTEM_PROMPT, &prompt).await?)
}
