use thiserror::Error;

/// Errors surfaced by the workspace layer.
///
/// Entity-store operations additionally record failures on the owning
/// store's error flag; this type is what the caller's `?` sees.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("could not reach the Onevo API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("authentication failed — the API token was rejected")]
    AuthenticationFailed,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{entity_type} '{identifier}' not found")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("validation failed: {message}")]
    ValidationFailed { message: String },

    /// The workspace was shut down while the operation was in flight.
    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<onevo_api::Error> for CoreError {
    fn from(err: onevo_api::Error) -> Self {
        match err {
            onevo_api::Error::InvalidToken => Self::AuthenticationFailed,
            onevo_api::Error::Api {
                status, message, ..
            } => Self::Api { status, message },
            onevo_api::Error::Http(e) => {
                let url = e
                    .url()
                    .map_or_else(|| "(unknown)".to_owned(), ToString::to_string);
                Self::ConnectionFailed {
                    url,
                    reason: e.to_string(),
                }
            }
            onevo_api::Error::Url(e) => Self::Config {
                message: e.to_string(),
            },
            onevo_api::Error::Deserialization { message, .. } => {
                Self::Internal(format!("unexpected response shape: {message}"))
            }
        }
    }
}
