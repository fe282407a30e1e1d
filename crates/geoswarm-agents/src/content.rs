//! Content Generator: produce one artifact for one platform from a task
//! description and brand context. One completion call per invocation — no
//! batching, no caching, no retry.

use geoswarm_core::{BrandContext, Platform};
use geoswarm_llm::LlmClient;
use serde::Deserialize;

use crate::error::AgentError;

/// Static generation profile for a platform: persona, platform knowledge,
/// and the expected output format. Carried as policy, not configuration.
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub platform_knowledge: &'static str,
    pub output_format: &'static str,
}

impl PlatformProfile {
    /// Look up the profile for a platform. Total over the closed enum, so an
    /// unknown platform can only be rejected earlier, at normalization.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Blog => Self {
                name: "Blog Agent",
                role: "SEO-optimized long-form content specialist",
                platform_knowledge: "\
                    - Optimal length: 1500-2500 words\n\
                    - H2/H3 heading structure every 300 words\n\
                    - SEO keyword density: 1-2%\n\
                    - Include meta description (150-160 chars)\n\
                    - Internal and external linking opportunities\n\
                    - Featured snippet optimization\n\
                    - Conversational yet authoritative tone",
                output_format:
                    "Full blog article with title, meta description, headings, and body content",
            },
            Platform::Twitter => Self {
                name: "Twitter Agent",
                role: "Viral thread and engagement specialist",
                platform_knowledge: "\
                    - Thread hook: first tweet must grab attention immediately\n\
                    - Optimal thread length: 5-10 tweets\n\
                    - 280 character limit per tweet\n\
                    - Use line breaks for readability\n\
                    - Hashtags: 2-3 max, strategically placed\n\
                    - End with strong CTA\n\
                    - Conversational, punchy tone",
                output_format: "Twitter thread with 5-10 tweets, each under 280 characters",
            },
            Platform::Linkedin => Self {
                name: "LinkedIn Agent",
                role: "B2B professional content and thought leadership specialist",
                platform_knowledge: "\
                    - Professional tone with personality\n\
                    - Optimal length: 1200-1500 words for articles\n\
                    - Data and statistics integration\n\
                    - Industry insights and trends\n\
                    - Clear value proposition\n\
                    - Call-to-action for networking\n\
                    - Focus on business outcomes and ROI",
                output_format:
                    "LinkedIn article or post with professional formatting and business focus",
            },
        }
    }
}

/// One generated artifact, before persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedDraft {
    pub title: String,
    pub body: String,
    pub metadata: Option<String>,
}

fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "body": { "type": "string" },
            "metadata": { "type": "string" }
        },
        "required": ["title", "body"],
        "additionalProperties": false
    })
}

fn build_prompt(profile: &PlatformProfile, task: &str, context: &BrandContext) -> String {
    format!(
        "You are the {}, a {}.\n\n\
         {}\n\n\
         PLATFORM KNOWLEDGE:\n{}\n\n\
         TASK: {task}\n\n\
         Generate high-quality, on-brand content that follows platform best practices.\n\
         Output format: {}",
        profile.name,
        profile.role,
        context.render(),
        profile.platform_knowledge,
        profile.output_format,
    )
}

/// Generate one artifact for `platform`.
///
/// # Errors
///
/// Returns [`AgentError::Llm`] if the completion call fails and
/// [`AgentError::Malformed`] if the result does not match the expected shape.
pub async fn generate_content(
    llm: &LlmClient,
    platform: Platform,
    task: &str,
    context: &BrandContext,
) -> Result<GeneratedDraft, AgentError> {
    let profile = PlatformProfile::for_platform(platform);
    let system = format!(
        "You are {}. Create exceptional, platform-optimized content. \
         Always respond in valid JSON format.",
        profile.name
    );
    let prompt = build_prompt(&profile, task, context);

    let value = llm
        .chat_structured(&system, &prompt, "content_output", response_schema())
        .await?;

    serde_json::from_value(value).map_err(AgentError::malformed("content generation"))
}
