//! # 1Password Vault Adapter
//!
//! The vault collaborator contract (exists / create vault / create item)
//! and its implementation over the 1Password CLI. The sync orchestrator
//! only sees the [`Vault`] trait.

use std::io::ErrorKind;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::record::{CredentialRecord, Field, FieldKind};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("failed to run the 1Password CLI: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("{0}")]
    Command(String),
}

/// Destination of credential records.
pub trait Vault: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool, VaultError>;
    fn create_vault(&self, name: &str) -> Result<(), VaultError>;
    fn create_item(&self, name: &str, record: &CredentialRecord) -> Result<(), VaultError>;
}

/// Renders the `op` arguments creating one item.
///
/// Shared by the real vault call and the dry-run echo, so the echo is
/// exactly what would have run.
pub fn item_create_args(vault: &str, record: &CredentialRecord) -> Vec<String> {
    let mut args: Vec<String> = [
        "item",
        "create",
        "--vault",
        vault,
        "--category",
        "login",
        "--title",
        record.title.as_str(),
        "--url",
        record.url.as_str(),
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();

    if !record.tags.is_empty() {
        args.push("--tags".to_string());
        args.push(record.tags.join(","));
    }

    args.extend(record.fields.iter().map(field_assignment));
    args
}

/// One `op` field assignment, `[section.]label[type]=value`.
fn field_assignment(field: &Field) -> String {
    let label = match &field.section {
        Some(section) => format!("{section}.{}", field.label),
        None => field.label.clone(),
    };
    match field.kind {
        FieldKind::Text => format!("{label}={}", field.value),
        FieldKind::Concealed => format!("{label}[concealed]={}", field.value),
        FieldKind::Email => format!("{label}[email]={}", field.value),
    }
}

/// Verifies the 1Password CLI is installed and signed in.
///
/// Runs before any network call so a missing collaborator fails fast.
pub fn ensure_op_ready() -> Result<(), VaultError> {
    match Command::new("op").arg("--version").output() {
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(VaultError::Command(
                "1Password CLI not found in PATH\n\
                 Please install it https://1password.com/downloads/command-line/"
                    .to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
        Ok(_) => {}
    }

    let accounts = Command::new("op").args(["account", "list"]).output()?;
    if accounts.stdout.is_empty() {
        return Err(VaultError::Command(
            "1Password CLI not signed in\n\
             Please run `op signin <your.1password.com>`"
                .to_string(),
        ));
    }
    Ok(())
}

/// Vault access through the `op` binary.
pub struct OpCli;

impl OpCli {
    fn run(&self, args: &[String]) -> Result<(), VaultError> {
        // Arguments carry secrets, so log only the verb.
        debug!("Running op {}", args[..2.min(args.len())].join(" "));
        let output = Command::new("op").args(args).output()?;
        if !output.status.success() {
            return Err(VaultError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

impl Vault for OpCli {
    fn exists(&self, name: &str) -> Result<bool, VaultError> {
        let output = Command::new("op").args(["vault", "get", name]).output()?;
        Ok(output.status.success())
    }

    fn create_vault(&self, name: &str) -> Result<(), VaultError> {
        self.run(&[
            "vault".to_string(),
            "create".to_string(),
            name.to_string(),
        ])
    }

    fn create_item(&self, name: &str, record: &CredentialRecord) -> Result<(), VaultError> {
        self.run(&item_create_args(name, record))
    }
}
