//! Keyword Research stage: propose high-opportunity keywords/queries for the
//! campaign goal. The stage trusts the structured result as-is — no local
//! ranking or filtering.

use geoswarm_core::BrandContext;
use geoswarm_llm::LlmClient;
use serde::Deserialize;

use crate::error::AgentError;

const SYSTEM_PROMPT: &str = "You are an expert keyword researcher specializing in Generative \
     Engine Optimization (GEO). Always respond in valid JSON format.";

/// One proposed keyword/query with its two ordinal ratings and rationale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCandidate {
    pub keyword: String,
    pub citation_potential: String,
    pub competition: String,
    pub reasoning: String,
}

/// Result of the keyword research stage.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordResearch {
    pub keywords: Vec<KeywordCandidate>,
    pub summary: String,
}

impl KeywordResearch {
    /// Join the keyword phrases into the single display string persisted on
    /// the campaign and used to ground the strategy prompt.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.keywords
            .iter()
            .map(|k| k.keyword.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Timeline message: the summary followed by each keyword's ratings and
    /// rationale.
    #[must_use]
    pub fn timeline_message(&self) -> String {
        let mut message = self.summary.clone();
        for k in &self.keywords {
            message.push_str(&format!(
                "\n- {} (citation potential: {}, competition: {}): {}",
                k.keyword, k.citation_potential, k.competition, k.reasoning
            ));
        }
        message
    }
}

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "keywords": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "keyword": { "type": "string" },
                        "citationPotential": { "type": "string" },
                        "competition": { "type": "string" },
                        "reasoning": { "type": "string" }
                    },
                    "required": ["keyword", "citationPotential", "competition", "reasoning"],
                    "additionalProperties": false
                }
            },
            "summary": { "type": "string" }
        },
        "required": ["keywords", "summary"],
        "additionalProperties": false
    })
}

fn build_prompt(goal: &str, context: &BrandContext) -> String {
    format!(
        "You are the Keyword Researcher Agent, an expert in analyzing AI search engine queries \
         and identifying high-opportunity keywords for Generative Engine Optimization (GEO).\n\n\
         {}\n\n\
         CAMPAIGN GOAL: {goal}\n\n\
         Your task:\n\
         1. Analyze what queries users ask AI engines related to this campaign goal\n\
         2. Identify 3-5 high-opportunity keywords/queries where the brand can become the cited authority\n\
         3. Evaluate each keyword's citation potential and competition level (High/Medium/Low)\n\
         4. Provide strategic reasoning for each keyword\n\n\
         Focus on keywords with high citation potential, low to medium competition, alignment with \
         brand expertise, and queries that require authoritative, data-driven answers.",
        context.render()
    )
}

/// Run the keyword research stage: one structured completion call.
///
/// # Errors
///
/// Returns [`AgentError::Llm`] if the completion call fails and
/// [`AgentError::Malformed`] if the result does not match the expected shape.
pub async fn research_keywords(
    llm: &LlmClient,
    goal: &str,
    context: &BrandContext,
) -> Result<KeywordResearch, AgentError> {
    let prompt = build_prompt(goal, context);
    let value = llm
        .chat_structured(SYSTEM_PROMPT, &prompt, "keyword_research", response_schema())
        .await?;

    serde_json::from_value(value).map_err(AgentError::malformed("keyword research"))
}
