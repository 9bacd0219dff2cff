//! # typegate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typegate_cli::schema::{run_schema, SchemaArgs};
use typegate_cli::types::{run_types, TypesArgs};
use typegate_cli::validate::{run_validate, ValidateArgs};
use typegate_cli::ClientOptions;

/// typegate — dynamic JSON validation against registry types.
#[derive(Parser, Debug)]
#[command(name = "typegate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    client: ClientOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON payload against a named type.
    Validate(ValidateArgs),

    /// Fetch the JSON-schema bundle for a type.
    Schema(SchemaArgs),

    /// List the registry's message types.
    Types(TypesArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(&cli.client, args).await.map(|passed| {
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
        Commands::Schema(args) => run_schema(&cli.client, args).await.map(|()| ExitCode::SUCCESS),
        Commands::Types(args) => run_types(&cli.client, args).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
