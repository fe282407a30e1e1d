//! Brand context: the static descriptive profile every generation stage is
//! grounded in.

use serde::{Deserialize, Serialize};

/// The closed set of brand voices a profile may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandVoice {
    Professional,
    Casual,
    Friendly,
    Authoritative,
}

impl BrandVoice {
    /// Parse a stored/user-supplied voice label. Returns `None` for anything
    /// outside the closed set.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "professional" => Some(Self::Professional),
            "casual" => Some(Self::Casual),
            "friendly" => Some(Self::Friendly),
            "authoritative" => Some(Self::Authoritative),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Friendly => "friendly",
            Self::Authoritative => "authoritative",
        }
    }
}

impl std::fmt::Display for BrandVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for BrandVoice {
    fn default() -> Self {
        Self::Professional
    }
}

/// Immutable snapshot of a brand profile, rendered into the prompt preamble
/// consumed by every stage of a campaign run. Read-only within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandContext {
    pub company_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub product_service: Option<String>,
    pub target_audience: Option<String>,
    pub brand_voice: BrandVoice,
    pub value_propositions: Option<String>,
    pub competitors: Option<String>,
    pub marketing_goals: Option<String>,
}

impl BrandContext {
    /// Render the `BRAND CONTEXT:` prompt preamble. Absent fields render as
    /// `Not specified` so the model never sees dangling labels.
    #[must_use]
    pub fn render(&self) -> String {
        fn or_unspecified(value: Option<&String>) -> &str {
            value.map_or("Not specified", String::as_str)
        }

        format!(
            "BRAND CONTEXT:\n\
             Company: {}\n\
             Industry: {}\n\
             Description: {}\n\
             Product/Service: {}\n\
             Target Audience: {}\n\
             Brand Voice: {}\n\
             Value Propositions: {}\n\
             Competitors: {}\n\
             Marketing Goals: {}",
            self.company_name,
            or_unspecified(self.industry.as_ref()),
            or_unspecified(self.description.as_ref()),
            or_unspecified(self.product_service.as_ref()),
            or_unspecified(self.target_audience.as_ref()),
            self.brand_voice,
            or_unspecified(self.value_propositions.as_ref()),
            or_unspecified(self.competitors.as_ref()),
            or_unspecified(self.marketing_goals.as_ref()),
        )
    }
}
