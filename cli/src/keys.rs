//! Credential-key loading: explicit arguments, the environment, or an
//! interactive prompt, in that order of preference.

use std::env;

use console::Term;
use thiserror::Error;
use tracing::debug;

use crate::commands::CommandLine;

/// Env file sourced before reading `APIKEY` with `--env`.
const ENV_FILE: &str = ".aeza1password.env";
const ENV_VAR: &str = "APIKEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API keys supplied\n\
         Pass keys as arguments, set APIKEY and use --env, or enter them at the prompt"
    )]
    NoKeys,
    #[error("failed to read API keys from the terminal: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Resolves the ordered credential-key set from the selected source.
///
/// `--env` and explicit keys are mutually exclusive (enforced by clap);
/// with neither present the user is prompted once.
pub fn resolve(args: &CommandLine) -> Result<Vec<String>, ConfigError> {
    if args.env {
        let _ = dotenvy::from_filename(ENV_FILE);
        let value = env::var(ENV_VAR).unwrap_or_default();
        let keys = split_keys(&value);
        if keys.is_empty() {
            return Err(ConfigError::NoKeys);
        }
        debug!("Loaded {} API key(s) from {ENV_VAR}", keys.len());
        return Ok(keys);
    }

    if !args.keys.is_empty() {
        return Ok(args.keys.clone());
    }

    let term = Term::stderr();
    term.write_str("Enter API key(s), comma-separated: ")?;
    let keys = split_keys(&term.read_line()?);
    if keys.is_empty() {
        return Err(ConfigError::NoKeys);
    }
    Ok(keys)
}

/// Splits a comma-separated key list, dropping empty segments.
fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
