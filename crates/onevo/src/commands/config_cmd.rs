//! `onevo config` — profiles, defaults, and credential storage.

use std::io::IsTerminal;

use dialoguer::{Input, Password};

use onevo_config::{Config, Profile, store_token};

use crate::cli::{ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, config_path, load_config, load_config_or_default, save_config};
use crate::error::{CliError, CliResult};

pub fn handle(opts: &GlobalOpts, command: ConfigCommand) -> CliResult {
    match command {
        ConfigCommand::Init => init(opts),
        ConfigCommand::Show => show(opts),
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommand::Profiles => profiles(),
        ConfigCommand::Use { name } => use_profile(&name),
        ConfigCommand::SetToken { profile } => set_token(opts, profile.as_deref()),
    }
}

fn init(opts: &GlobalOpts) -> CliResult {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Config {
            message: "config init is interactive; edit the config file directly in scripts".into(),
        });
    }

    let mut config = load_config_or_default();
    let profile_name = opts.profile.clone().unwrap_or_else(|| "default".to_owned());

    eprintln!("Setting up profile '{profile_name}' ({})", config_path().display());

    let api_url: String = Input::new()
        .with_prompt("API base URL")
        .default("https://api.onevo.app/v1".into())
        .interact_text()
        .map_err(io_err)?;

    let tenant_id: String = Input::new()
        .with_prompt("Tenant id")
        .interact_text()
        .map_err(io_err)?;

    let subscription_type: String = Input::new()
        .with_prompt("Plan catalog (User or Agency)")
        .default("Agency".into())
        .interact_text()
        .map_err(io_err)?;

    let token: String = Password::new()
        .with_prompt("API token (stored in the system keyring; leave empty to skip)")
        .allow_empty_password(true)
        .interact()
        .map_err(io_err)?;

    config.profiles.insert(
        profile_name.clone(),
        Profile {
            api_url,
            tenant_id,
            subscription_type,
            token: None,
            token_env: None,
            timeout: None,
        },
    );
    if config.default_profile.is_none() {
        config.default_profile = Some(profile_name.clone());
    }

    save_config(&config)?;
    eprintln!("wrote {}", config_path().display());

    if !token.is_empty() {
        store_token(&profile_name, &token)?;
        eprintln!("token stored in the system keyring");
    }
    Ok(())
}

fn show(opts: &GlobalOpts) -> CliResult {
    let config = load_config()?;
    let active = active_profile_name(opts, &config);

    println!("config file: {}", config_path().display());
    println!("active profile: {active}");
    println!();

    // Re-serialize rather than echoing the file so env overrides show.
    let rendered = toml::to_string_pretty(&redact(&config)).map_err(|e| CliError::Internal {
        message: e.to_string(),
    })?;
    print!("{rendered}");
    Ok(())
}

fn profiles() -> CliResult {
    let config = load_config_or_default();
    let default = config.default_profile.as_deref();

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    if names.is_empty() {
        println!("(no profiles — run `onevo config init`)");
        return Ok(());
    }
    for name in names {
        if Some(name.as_str()) == default {
            println!("{name} (default)");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

fn use_profile(name: &str) -> CliResult {
    let mut config = load_config_or_default();
    if !config.profiles.contains_key(name) {
        return Err(CliError::UnknownProfile { name: name.into() });
    }
    config.default_profile = Some(name.to_owned());
    save_config(&config)?;
    eprintln!("default profile set to '{name}'");
    Ok(())
}

fn set_token(opts: &GlobalOpts, profile: Option<&str>) -> CliResult {
    let config = load_config_or_default();
    let profile_name = profile
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| active_profile_name(opts, &config));

    if !config.profiles.contains_key(&profile_name) {
        return Err(CliError::UnknownProfile { name: profile_name });
    }

    if !std::io::stdin().is_terminal() {
        return Err(CliError::Config {
            message: "set-token is interactive; use the ONEVO_TOKEN env var in scripts".into(),
        });
    }

    let token: String = Password::new()
        .with_prompt(format!("API token for '{profile_name}'"))
        .interact()
        .map_err(io_err)?;

    store_token(&profile_name, &token)?;
    eprintln!("token stored for '{profile_name}'");
    Ok(())
}

/// Strip plaintext tokens before echoing config to the terminal.
fn redact(config: &Config) -> Config {
    let mut c = config.clone();
    for profile in c.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("<redacted>".into());
        }
    }
    c
}

fn io_err(e: dialoguer::Error) -> CliError {
    CliError::Io {
        message: e.to_string(),
    }
}
