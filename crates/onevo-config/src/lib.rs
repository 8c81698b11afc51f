//! Shared configuration for the Onevo CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `onevo_core::WorkspaceConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use onevo_core::WorkspaceConfig;
use onevo_core::model::SubscriptionType;

pub mod selection;

pub use selection::FileSelectionStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named tenant profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named tenant profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://api.onevo.app/v1").
    pub api_url: String,

    /// Tenant identifier the session belongs to.
    pub tenant_id: String,

    /// Plan catalog: "User" or "Agency".
    #[serde(default = "default_subscription_type")]
    pub subscription_type: String,

    /// API token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_subscription_type() -> String {
    "Agency".into()
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("app", "onevo", "onevo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the selection state file path (per-profile).
pub fn selection_path(profile_name: &str) -> PathBuf {
    ProjectDirs::from("app", "onevo", "onevo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push(format!("{profile_name}.selection"));
            p
        },
        |dirs| {
            dirs.data_local_dir()
                .join(format!("{profile_name}.selection"))
        },
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("onevo");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ONEVO_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve an API token from the credential chain:
/// env var → system keyring → plaintext config value.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup (ONEVO_TOKEN as implicit fallback)
    let env_name = profile.token_env.as_deref().unwrap_or("ONEVO_TOKEN");
    if let Ok(val) = std::env::var(env_name) {
        if !val.is_empty() {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("onevo", &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for a profile.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new("onevo", &format!("{profile_name}/token")).map_err(|e| {
        ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        }
    })?;
    entry
        .set_password(token)
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── WorkspaceConfig translation ─────────────────────────────────────

/// Build a `WorkspaceConfig` from a profile — no CLI flag overrides.
pub fn profile_to_workspace_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<WorkspaceConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let token = resolve_token(profile, profile_name)?;

    let subscription_type: SubscriptionType = profile
        .subscription_type
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "subscription_type".into(),
            reason: format!(
                "expected 'User' or 'Agency', got '{}'",
                profile.subscription_type
            ),
        })?;

    let mut config = WorkspaceConfig::new(api_url, profile.tenant_id.clone(), token);
    config.subscription_type = subscription_type;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(30));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            api_url: "https://api.onevo.test/v1".into(),
            tenant_id: "tenant-1".into(),
            subscription_type: "Agency".into(),
            token: Some("plain-token".into()),
            token_env: None,
            timeout: Some(10),
        }
    }

    #[test]
    fn plaintext_token_resolves_as_last_resort() {
        let token = resolve_token(&profile(), "nonexistent-profile-for-test").unwrap();
        use secrecy::ExposeSecret;
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn profile_translates_to_workspace_config() {
        let config = profile_to_workspace_config(&profile(), "test").unwrap();
        assert_eq!(config.tenant_id, "tenant-1");
        assert_eq!(config.subscription_type, SubscriptionType::Agency);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn invalid_subscription_type_is_rejected() {
        let mut p = profile();
        p.subscription_type = "Enterprise".into();
        assert!(matches!(
            profile_to_workspace_config(&p, "test"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn missing_token_reports_profile_name() {
        let mut p = profile();
        p.token = None;
        p.token_env = Some("ONEVO_TEST_TOKEN_THAT_IS_UNSET".into());
        let err = resolve_token(&p, "staging").unwrap_err();
        assert!(err.to_string().contains("staging"));
    }
}
