//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use dialoguer::Confirm;

use onevo_config::FileSelectionStore;
use onevo_core::Workspace;

use crate::cli::GlobalOpts;
use crate::config::{active_profile_name, load_config_or_default, resolve_workspace_config};
use crate::error::{CliError, CliResult};

/// Open a workspace session from config + flags. Selection state is
/// persisted per profile so it survives across invocations.
pub fn open_workspace(opts: &GlobalOpts) -> CliResult<Workspace> {
    let config = load_config_or_default();
    let profile_name = active_profile_name(opts, &config);
    let workspace_config = resolve_workspace_config(opts, &config)?;

    let selection = Arc::new(FileSelectionStore::for_profile(&profile_name));
    Ok(Workspace::new(workspace_config, selection)?)
}

/// Ask the user to confirm a destructive action. `--yes` bypasses the
/// prompt; non-interactive sessions without `--yes` refuse.
pub fn confirm(opts: &GlobalOpts, prompt: &str) -> CliResult<()> {
    if opts.yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io {
            message: e.to_string(),
        })?;

    if confirmed {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

/// Spinner shown while a request is in flight (interactive table mode
/// only; suppressed for machine-readable output).
pub fn spinner(opts: &GlobalOpts, message: &str) -> Option<indicatif::ProgressBar> {
    use crate::cli::OutputFormat;

    if opts.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    if !matches!(opts.output, OutputFormat::Table) {
        return None;
    }

    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(pb)
}

pub fn finish_spinner(pb: Option<indicatif::ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}
