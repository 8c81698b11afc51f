//! CLI error type with miette diagnostics and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use onevo_core::CoreError;

/// Process exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const CONFIG: u8 = 3;
    pub const AUTH: u8 = 4;
    pub const CONNECTION: u8 = 5;
    pub const NOT_FOUND: u8 = 6;
    pub const API: u8 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("could not reach the Onevo API at {url}")]
    #[diagnostic(
        code(onevo::connection),
        help("Check the URL and your network connection. Is the API reachable from here?")
    )]
    Connection { url: String, reason: String },

    #[error("authentication failed")]
    #[diagnostic(
        code(onevo::auth),
        help("The API token was rejected. Run `onevo config set-token` to store a fresh one.")
    )]
    Auth,

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(onevo::api))]
    Api { status: u16, message: String },

    #[error("{entity_type} '{identifier}' not found")]
    #[diagnostic(code(onevo::not_found))]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("validation failed: {message}")]
    #[diagnostic(code(onevo::validation))]
    Validation { message: String },

    #[error("configuration error: {message}")]
    #[diagnostic(
        code(onevo::config),
        help("Run `onevo config init` to create a config file, or `onevo config show` to inspect it.")
    )]
    Config { message: String },

    #[error("profile '{name}' is not configured")]
    #[diagnostic(
        code(onevo::config::profile),
        help("List known profiles with `onevo config profiles`.")
    )]
    UnknownProfile { name: String },

    #[error("operation cancelled")]
    #[diagnostic(code(onevo::cancelled))]
    Cancelled,

    #[error("confirmation required")]
    #[diagnostic(
        code(onevo::confirm),
        help("Re-run with --yes to skip the prompt in non-interactive sessions.")
    )]
    ConfirmationRequired,

    #[error("{message}")]
    #[diagnostic(code(onevo::io))]
    Io { message: String },

    #[error("internal error: {message}")]
    #[diagnostic(code(onevo::internal))]
    Internal { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::Auth => exit_code::AUTH,
            Self::Api { .. } => exit_code::API,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ConfirmationRequired => exit_code::USAGE,
            Self::Config { .. } | Self::UnknownProfile { .. } => exit_code::CONFIG,
            Self::Cancelled | Self::Io { .. } | Self::Internal { .. } => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::Connection { url, reason },
            CoreError::AuthenticationFailed => Self::Auth,
            CoreError::Api { status, message } => Self::Api { status, message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                entity_type,
                identifier,
            },
            CoreError::ValidationFailed { message } => Self::Validation { message },
            CoreError::Cancelled => Self::Cancelled,
            CoreError::Config { message } => Self::Config { message },
            CoreError::Internal(message) => Self::Internal { message },
        }
    }
}

impl From<onevo_config::ConfigError> for CliError {
    fn from(err: onevo_config::ConfigError) -> Self {
        match err {
            onevo_config::ConfigError::Io(e) => Self::Io {
                message: e.to_string(),
            },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Internal {
            message: format!("YAML serialization failed: {err}"),
        }
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_matching_exit_codes() {
        let auth: CliError = CoreError::AuthenticationFailed.into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing: CliError = CoreError::NotFound {
            entity_type: "client".into(),
            identifier: "c-1".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let api: CliError = CoreError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(api.exit_code(), exit_code::API);
    }
}
