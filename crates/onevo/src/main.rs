//! `onevo` binary entry point.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        let report = miette::Report::new(err);
        eprintln!("{report:?}");
        std::process::exit(i32::from(code));
    }
}

async fn run(cli: Cli) -> CliResult {
    match cli.command {
        // No workspace needed: local-only commands.
        Command::Config(args) => commands::config_cmd::handle(&cli.global, args.command),
        Command::Completions(args) => {
            commands::completions(args.shell);
            Ok(())
        }

        Command::Clients(args) => commands::clients::handle(&cli.global, args.command).await,
        Command::Billing(args) => commands::billing::handle(&cli.global, args.command).await,
        Command::Webhooks(args) => commands::webhooks::handle(&cli.global, args.command).await,
        Command::Posts(args) => commands::posts::handle(&cli.global, args.command).await,
    }
}

/// Map -v counts to a tracing filter; RUST_LOG wins when set.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "onevo=info,onevo_core=info,onevo_api=info",
        2 => "onevo=debug,onevo_core=debug,onevo_api=debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
