//! Command implementations

use payshield::{
    ConfigLoader, HsmClient, HsmConfig, HsmError, HsmTransport, from_hex, mask_card_number,
    to_hex,
};
use tracing::{debug, info};

use crate::cli::{Commands, ConnectionArgs};
use crate::error::{CliError, CliResult};
use crate::output::{Outcome, Report};

/// Layer the connection flags over file and environment configuration.
pub fn load_config(args: &ConnectionArgs) -> CliResult<HsmConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(host) = &args.host {
        loader = loader.set("host", host.as_str());
    }
    if let Some(port) = args.port {
        loader = loader.set("port", port);
    }
    if let Some(dpk) = &args.dpk {
        loader = loader.set("dpk", dpk.as_str());
    }
    if let Some(timeout_ms) = args.timeout_ms {
        loader = loader.set("timeout_ms", timeout_ms);
    }
    Ok(loader.load()?)
}

/// Run `command` against `client`.
pub fn execute<T: HsmTransport>(command: &Commands, client: &HsmClient<T>) -> CliResult<Report> {
    let operation = command.name();
    debug!(operation, "Running command");

    let outcome = match command {
        Commands::Check => Outcome::Availability {
            available: client.check_availability(),
        },
        Commands::EncryptKey { key_hex } => value(
            operation,
            client.encrypt_hex_key_to_hex(key_hex)?,
        )?,
        Commands::DecryptKey { ciphertext_hex } => value(
            operation,
            client.decrypt_key_to_hex(ciphertext_hex)?,
        )?,
        Commands::Translate {
            ciphertext_hex,
            parse,
        } => {
            let reply = if *parse {
                client.legacy_translate_key(ciphertext_hex)?
            } else {
                client.legacy_translate(ciphertext_hex)?
            };
            value(operation, reply)?
        }
        Commands::DecryptData {
            wrapped_key_hex,
            data_hex,
            mask,
            mask_char,
        } => {
            let cipher = client
                .cipher_for(wrapped_key_hex)?
                .ok_or(CliError::NoReply { operation })?;
            let clear = cipher
                .decrypt_hex_to_string(data_hex)
                .map_err(HsmError::from)?;
            let shown = match mask {
                Some(pattern) => mask_card_number(&clear, pattern, *mask_char)?,
                None => clear,
            };
            Outcome::Ok { value: shown }
        }
        Commands::Raw { request_hex } => {
            let request = from_hex(request_hex).map_err(HsmError::from)?;
            Outcome::Ok {
                value: to_hex(&client.raw_request(&request)?),
            }
        }
    };

    info!(operation, "Command finished");
    Ok(Report {
        operation,
        endpoint: client.endpoint(),
        outcome,
    })
}

fn value(operation: &'static str, reply: Option<String>) -> CliResult<Outcome> {
    reply
        .map(|value| Outcome::Ok { value })
        .ok_or(CliError::NoReply { operation })
}
