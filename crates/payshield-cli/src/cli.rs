//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "payshield",
    version,
    about = "Talk to a PayShield-style HSM: wrap and unwrap keys, translate, decrypt card data",
    long_about = "payshield sends key encrypt/decrypt and legacy M2 translation commands to a\n\
                  PayShield-style HSM over TCP, one connection per command.\n\n\
                  Connection settings come from --config, then PAYSHIELD_* environment\n\
                  variables, then the flags below.\n\n\
                  SECURITY WARNINGS:\n\
                  - Key material given as arguments may be visible to other local users\n\
                  - Clear keys printed by decrypt-key end up in your terminal scrollback"
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where the HSM is and how to address it
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// HSM host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// HSM port
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub port: Option<i64>,

    /// DPK reference placed in key commands
    #[arg(long, global = true)]
    pub dpk: Option<String>,

    /// Per-call timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check that the HSM accepts connections
    Check,

    /// Encrypt a clear key under the DPK
    EncryptKey {
        /// Clear key as hex
        key_hex: String,
    },

    /// Decrypt a key wrapped under the DPK
    DecryptKey {
        /// Wrapped key as hex
        ciphertext_hex: String,
    },

    /// Send a legacy M2 translation
    Translate {
        /// Data to translate, as hex
        ciphertext_hex: String,

        /// Print only the message field of the reply instead of the raw reply
        #[arg(long)]
        parse: bool,
    },

    /// Unwrap a data key on the HSM, then decrypt card data locally
    DecryptData {
        /// Wrapped data key as hex
        wrapped_key_hex: String,

        /// AES/ECB ciphertext as hex
        data_hex: String,

        /// Mask pattern: '%' copies a digit, the mask character hides one
        #[arg(long, short = 'm')]
        mask: Option<String>,

        /// Character that hides a digit in --mask
        #[arg(long, default_value_t = '*')]
        mask_char: char,
    },

    /// Send raw request bytes and print the reply
    Raw {
        /// Request bytes as hex
        request_hex: String,
    },
}

impl Commands {
    /// Name used in output and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::EncryptKey { .. } => "encrypt-key",
            Self::DecryptKey { .. } => "decrypt-key",
            Self::Translate { .. } => "translate",
            Self::DecryptData { .. } => "decrypt-data",
            Self::Raw { .. } => "raw",
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable
    Human,
    /// JSON output
    Json,
}
