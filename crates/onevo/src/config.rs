//! Flag-aware configuration resolution on top of `onevo-config`.

use std::time::Duration;

use secrecy::SecretString;

use onevo_config::{Config, Profile, profile_to_workspace_config};
use onevo_core::WorkspaceConfig;

use crate::cli::GlobalOpts;
use crate::error::{CliError, CliResult};

pub use onevo_config::{config_path, load_config, load_config_or_default, save_config};

/// The profile name in effect: `--profile` / `ONEVO_PROFILE` beats the
/// config file's `default_profile`, which beats "default".
pub fn active_profile_name(opts: &GlobalOpts, config: &Config) -> String {
    opts.profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".to_owned())
}

/// Resolve the effective `WorkspaceConfig`: profile settings from the
/// config file with CLI flag / env overrides layered on top.
pub fn resolve_workspace_config(opts: &GlobalOpts, config: &Config) -> CliResult<WorkspaceConfig> {
    let name = active_profile_name(opts, config);

    // Flags alone can stand in for a missing profile as long as they
    // cover the required fields.
    let mut workspace = match config.profiles.get(&name) {
        Some(profile) if opts.token.is_some() => {
            // A token flag makes credential resolution unnecessary.
            let mut p = profile.clone();
            p.token = opts.token.clone();
            p.token_env = None;
            profile_to_workspace_config(&p, &name)?
        }
        Some(profile) => profile_to_workspace_config(profile, &name)?,
        None => from_flags_only(opts).map_err(|_| CliError::UnknownProfile { name })?,
    };

    if let Some(ref api_url) = opts.api_url {
        workspace.api_url = parse_url(api_url)?;
    }
    if let Some(ref tenant) = opts.tenant {
        workspace.tenant_id.clone_from(tenant);
    }
    if let Some(ref token) = opts.token {
        workspace.token = SecretString::from(token.clone());
    }
    if let Some(timeout) = opts.timeout {
        workspace.timeout = Duration::from_secs(timeout);
    }

    Ok(workspace)
}

/// Look up a profile for config subcommands that operate on one.
pub fn require_profile<'c>(config: &'c Config, name: &str) -> CliResult<&'c Profile> {
    config
        .profiles
        .get(name)
        .ok_or_else(|| CliError::UnknownProfile { name: name.into() })
}

fn from_flags_only(opts: &GlobalOpts) -> CliResult<WorkspaceConfig> {
    let api_url = opts.api_url.as_deref().ok_or_else(|| CliError::Config {
        message: "no profile configured and --api-url not given".into(),
    })?;
    let tenant = opts.tenant.as_deref().ok_or_else(|| CliError::Config {
        message: "no profile configured and --tenant not given".into(),
    })?;
    let token = opts.token.as_deref().ok_or_else(|| CliError::Config {
        message: "no profile configured and --token not given".into(),
    })?;

    Ok(WorkspaceConfig::new(
        parse_url(api_url)?,
        tenant.to_owned(),
        SecretString::from(token.to_owned()),
    ))
}

fn parse_url(raw: &str) -> CliResult<url::Url> {
    raw.parse().map_err(|_| CliError::Validation {
        message: format!("'{raw}' is not a valid URL"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{ColorMode, OutputFormat};

    fn opts() -> GlobalOpts {
        GlobalOpts {
            profile: Some("test".into()),
            api_url: None,
            tenant: None,
            token: Some("flag-token".into()),
            output: OutputFormat::Table,
            color: ColorMode::Never,
            verbose: 0,
            quiet: false,
            yes: false,
            timeout: None,
        }
    }

    fn config_with_profile_timeout(timeout: Option<u64>) -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "test".into(),
            Profile {
                api_url: "https://api.onevo.test/v1".into(),
                tenant_id: "tenant-1".into(),
                subscription_type: "Agency".into(),
                token: Some("profile-token".into()),
                token_env: None,
                timeout,
            },
        );
        config
    }

    #[test]
    fn profile_timeout_applies_when_flag_absent() {
        let config = config_with_profile_timeout(Some(90));
        let workspace = resolve_workspace_config(&opts(), &config).unwrap();
        assert_eq!(workspace.timeout, Duration::from_secs(90));
    }

    #[test]
    fn timeout_flag_overrides_profile() {
        let config = config_with_profile_timeout(Some(90));
        let mut opts = opts();
        opts.timeout = Some(5);
        let workspace = resolve_workspace_config(&opts, &config).unwrap();
        assert_eq!(workspace.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_profile_timeout_keeps_default() {
        let config = config_with_profile_timeout(None);
        let workspace = resolve_workspace_config(&opts(), &config).unwrap();
        assert_eq!(workspace.timeout, Duration::from_secs(30));
    }
}
