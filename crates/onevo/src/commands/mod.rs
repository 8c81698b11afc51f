//! Command handlers.

pub mod billing;
pub mod clients;
pub mod config_cmd;
pub mod posts;
pub mod util;
pub mod webhooks;

use clap::CommandFactory;

/// Print shell completions to stdout.
pub fn completions(shell: clap_complete::Shell) {
    let mut cmd = crate::cli::Cli::command();
    clap_complete::generate(shell, &mut cmd, "onevo", &mut std::io::stdout());
}
