mod commands;
mod domain;
mod services;
mod telemetry;

#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::completions_cmd::completions_command;
use crate::commands::interactive_cmd::interactive_command;
use crate::commands::simulate_cmd::simulate_command;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    if !telemetry::init_tracing() {
        eprintln!("A log subscriber is already installed; keeping it");
    }
    let args = CliArgs::parse();
    match args.command {
        Commands::Simulate(simulate) => simulate_command(simulate).await,
        Commands::Interactive(interactive) => interactive_command(interactive).await,
        Commands::Completions { shell } => completions_command(shell),
    }
}
