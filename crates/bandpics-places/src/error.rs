use thiserror::Error;

/// Errors returned by the places client.
///
/// A non-200 answer from the provider is not an error: it comes back as
/// [`crate::NearbyOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum PlacesError {
    /// The client was constructed without a usable API key.
    #[error("places API key is missing or blank")]
    MissingApiKey,

    /// A request timeout of zero would fail every call before it is sent.
    #[error("places request timeout must be at least 1 second")]
    ZeroTimeout,

    /// The configured base URL could not be parsed.
    #[error("invalid places base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The caller passed coordinates or a radius the provider cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 200 response whose body does not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PlacesError {
    /// `true` for failures on the way to or from the provider, as opposed to
    /// configuration or caller mistakes.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Deserialize { .. })
    }
}
