use thiserror::Error;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, TLS, timeout, or non-2xx failure from the underlying HTTP
    /// client. The upstream-failure half of the taxonomy.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned 429. Kept separate from [`LlmError::Http`] so a
    /// future retry policy can target it; no retry is performed today.
    #[error("completion service rate limited the request")]
    RateLimited,

    /// The service returned an error envelope with a message.
    #[error("completion service error: {0}")]
    Api(String),

    /// The response body or the completion content failed JSON parsing
    /// against the expected shape.
    #[error("malformed completion for {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service returned no choices, or a null message content.
    #[error("completion service returned an empty completion")]
    EmptyCompletion,
}
