//! Strategy stage: turn the campaign goal into a strategy narrative and an
//! ordered list of per-platform assignments.

use geoswarm_core::BrandContext;
use geoswarm_llm::LlmClient;
use serde::Deserialize;

use crate::error::AgentError;

const SYSTEM_PROMPT: &str =
    "You are a master campaign strategist. Always respond in valid JSON format.";

/// One unit of work for a platform. `platform` is free text from the model
/// ("blog", "Blog Agent", ...); the worker normalizes it against the closed
/// platform set. `count` is a completion-service-controlled field — policy
/// asks for 1 per platform, but the worker loops whatever comes back.
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    pub platform: String,
    pub task: String,
    pub count: i64,
}

/// Result of the strategy stage.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyPlan {
    pub strategy: String,
    pub keywords: String,
    pub assignments: Vec<Assignment>,
}

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "strategy": { "type": "string" },
            "keywords": { "type": "string" },
            "assignments": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "platform": { "type": "string" },
                        "task": { "type": "string" },
                        "count": { "type": "number" }
                    },
                    "required": ["platform", "task", "count"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["strategy", "keywords", "assignments"],
        "additionalProperties": false
    })
}

fn build_prompt(goal: &str, context: &BrandContext, keywords: Option<&str>) -> String {
    let keyword_context = keywords.map_or_else(String::new, |k| {
        format!("\n\nTARGET KEYWORDS (from Keyword Researcher): {k}")
    });

    format!(
        "You are the GEO Master Agent, an expert in Generative Engine Optimization (GEO) - \
         optimizing content to be cited by AI search engines.\n\n\
         {}{keyword_context}\n\n\
         CAMPAIGN GOAL: {goal}\n\n\
         Your task:\n\
         1. Analyze the campaign goal and brand context\n\
         2. Create a GEO-optimized content strategy focused on becoming the cited authority\n\
         3. Assign specific tasks to specialized content platforms (blog, twitter, linkedin)\n\n\
         Focus on creating citation-worthy, authoritative content:\n\
         - blog: long-form authority content (2000+ words) optimized for AI citation\n\
         - twitter: thought leadership threads that establish topical authority\n\
         - linkedin: professional insights AI engines cite for business queries\n\n\
         IMPORTANT: Generate ONLY 1 piece of content per platform for faster execution.",
        context.render()
    )
}

/// Run the strategy stage: one structured completion call, grounded in the
/// keyword research when a keyword string is supplied.
///
/// # Errors
///
/// Returns [`AgentError::Llm`] if the completion call fails and
/// [`AgentError::Malformed`] if the result does not match the expected shape.
pub async fn create_strategy(
    llm: &LlmClient,
    goal: &str,
    context: &BrandContext,
    keywords: Option<&str>,
) -> Result<StrategyPlan, AgentError> {
    let prompt = build_prompt(goal, context, keywords);
    let value = llm
        .chat_structured(SYSTEM_PROMPT, &prompt, "campaign_strategy", response_schema())
        .await?;

    serde_json::from_value(value).map_err(AgentError::malformed("strategy"))
}
