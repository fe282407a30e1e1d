use thiserror::Error;

/// Errors returned by the stage functions.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion service call failed (network, timeout, rate limit,
    /// error envelope, or unparseable body).
    #[error(transparent)]
    Llm(#[from] geoswarm_llm::LlmError),

    /// The completion parsed as JSON but does not match the stage's expected
    /// shape. Surfaced as a tagged error, never a crash or a silent default.
    #[error("malformed {stage} response: {source}")]
    Malformed {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AgentError {
    pub(crate) fn malformed(stage: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Malformed { stage, source }
    }
}
