use thiserror::Error;

/// Errors produced by the Onevo API client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server rejected the bearer token (401).
    #[error("invalid or expired API token")]
    InvalidToken,

    /// A non-2xx response, or a `success: false` envelope on a 2xx.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    #[error("failed to deserialize response: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error is a plain 404 — callers use this to map
    /// "not found" on optional resources to an empty state.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
