// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! rowput - write single records to SQLite and publish what changed.
//!
//! This is the binary entry point for the rowput CLI.

mod put;

use clap::{Parser, Subcommand};
use rowput_core::RowputError;
use tracing::error;

/// rowput - write single records to SQLite and publish what changed.
#[derive(Parser, Debug)]
#[command(name = "rowput", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert or update one row and print the put result as JSON.
    Put(put::PutArgs),
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match rowput_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            rowput_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.log_level);

    let outcome = match cli.command {
        Some(Commands::Put(args)) => put::run_put(&config, args).await.and_then(|result| {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| RowputError::Internal(format!("failed to encode put result: {e}")))?;
            println!("{json}");
            Ok(())
        }),
        Some(Commands::Config) => config
            .to_toml_string()
            .map(|toml| print!("{toml}"))
            .map_err(|e| RowputError::Internal(format!("failed to encode config: {e}"))),
        None => {
            println!("rowput: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "command failed");
        eprintln!("rowput: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rowput={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_put_with_assignments() {
        let cli = Cli::try_parse_from([
            "rowput", "put", "--table", "users", "--id-column", "id", "--set", "name=Ada",
            "--set", "id=null",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Put(args)) => {
                assert_eq!(args.table, "users");
                assert_eq!(args.id_column.as_deref(), Some("id"));
                assert_eq!(args.set.len(), 2);
            }
            other => panic!("expected put command, got {other:?}"),
        }
    }

    #[test]
    fn cli_requires_table_for_put() {
        assert!(Cli::try_parse_from(["rowput", "put", "--set", "a=1"]).is_err());
    }

    #[test]
    fn cli_parses_config() {
        let cli = Cli::try_parse_from(["rowput", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = rowput_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.logging.log_level, "info");
    }
}
