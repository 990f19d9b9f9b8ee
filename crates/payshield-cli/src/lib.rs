//! # PayShield CLI
//!
//! Command-line front end for [`payshield::HsmClient`].
//!
//! ## Usage
//!
//! ```bash
//! # Is the HSM reachable?
//! payshield --host 10.0.0.5 --port 1500 --dpk S1009621AN00S0001 check
//!
//! # Wrap and unwrap a key
//! payshield -c hsm.toml encrypt-key 00000000000000000000000000000000
//! payshield -c hsm.toml decrypt-key 66E94BD4EF8A2C3B884CFA59CA342B2E
//!
//! # Decrypt card data with an HSM-unwrapped key, masked
//! payshield -c hsm.toml decrypt-data <WRAPPED_KEY> <DATA> --mask '%%%%%%******%%%%'
//! ```
//!
//! Logs go to stderr (`RUST_LOG` or `-v`); results go to stdout.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

use std::io;

use payshield::HsmClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub use cli::{Cli, Commands, ConnectionArgs, OutputFormat};
pub use error::{CliError, CliResult, ErrorCategory};
pub use output::{Outcome, Report};

/// Load configuration, build a client and run the parsed command.
pub fn run(cli: &Cli) -> CliResult<Report> {
    let config = commands::load_config(&cli.connection)?;
    let client = HsmClient::from_config(&config)?;
    commands::execute(&cli.command, &client)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: u8) -> CliResult<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
