//! Campaign stage functions: keyword research, strategy, per-platform
//! content generation, and feedback acknowledgment.
//!
//! Each stage is one schema-constrained call to the completion service plus
//! strict parsing of the result. Stages do no persistence and no retrying;
//! sequencing and failure policy belong to the campaign worker.

mod content;
mod error;
mod feedback;
mod keyword;
mod strategy;

pub use content::{generate_content, GeneratedDraft, PlatformProfile};
pub use error::AgentError;
pub use feedback::{acknowledge_feedback, FALLBACK_ACK};
pub use keyword::{research_keywords, KeywordCandidate, KeywordResearch};
pub use strategy::{create_strategy, Assignment, StrategyPlan};
