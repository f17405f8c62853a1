//! # Sync Orchestrator
//!
//! Implements the core sync use case: iterate credential keys, aggregate
//! servers, ensure the destination vault exists, and create one item per
//! server (or echo the would-be command in dry-run mode).
//!
//! **Architectural Note:**
//! The service depends on the [`ServerSource`] and [`Vault`] abstractions
//! only, so the whole pipeline runs against mocks in tests.

use aeza1password_common::config::Config;
use aeza1password_common::model::Server;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::ServerSource;
use crate::record::{self, CredentialRecord};
use crate::vault::{self, Vault};

#[derive(Debug, Error)]
pub enum SyncError {
    /// Every key was processed and none yielded a server.
    #[error("no servers found across any API key")]
    NoServersFound {
        /// Per-key outcomes, so a failed run still reports what each
        /// key yielded.
        keys: Vec<KeyReport>,
    },
    /// The destination vault is absent and could not be created.
    #[error("failed to create vault: {0}")]
    VaultCreateFailed(String),
}

/// Outcome of fetching one credential key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// Masked key, safe for logs.
    pub key: String,
    pub servers: usize,
    pub error: Option<String>,
}

/// Summary of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub keys: Vec<KeyReport>,
    /// Servers aggregated across all keys.
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    /// Built records in submission order; in dry-run mode these are what
    /// would have been submitted.
    pub records: Vec<CredentialRecord>,
}

/// Application service driving one sync run.
pub struct SyncService {
    source: Box<dyn ServerSource>,
    vault: Box<dyn Vault>,
}

impl SyncService {
    pub fn new(source: Box<dyn ServerSource>, vault: Box<dyn Vault>) -> Self {
        Self { source, vault }
    }

    /// Runs one full sync over `keys` in input order.
    ///
    /// Key failures and per-item creation failures are logged and
    /// skipped; only an empty aggregate or a failed vault creation
    /// terminates the run.
    pub async fn run(&self, keys: &[String], cfg: &Config) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport {
            keys: Vec::new(),
            total: 0,
            created: 0,
            failed: 0,
            records: Vec::new(),
        };

        let servers = self.aggregate_servers(keys, &mut report).await;
        report.total = servers.len();
        if servers.is_empty() {
            return Err(SyncError::NoServersFound { keys: report.keys });
        }

        if !cfg.dry_run {
            self.ensure_vault(&cfg.vault)?;
        }

        for server in &servers {
            let record = record::build_record(server);
            if cfg.dry_run {
                info!(
                    "[dry-run] op {}",
                    vault::item_create_args(&cfg.vault, &record).join(" ")
                );
            } else {
                // Best-effort batch: one failed item never aborts the rest.
                match self.vault.create_item(&cfg.vault, &record) {
                    Ok(()) => {
                        info!("Created item {}", record.title);
                        report.created += 1;
                    }
                    Err(err) => {
                        error!("Failed to create item {}: {err}", record.title);
                        report.failed += 1;
                    }
                }
            }
            report.records.push(record);
        }

        Ok(report)
    }

    /// Fetches every key in order, preserving per-key server order.
    async fn aggregate_servers(&self, keys: &[String], report: &mut SyncReport) -> Vec<Server> {
        let mut servers = Vec::new();

        for key in keys {
            let masked = mask_key(key);
            debug!("Fetching services for key {masked}");
            match self.source.fetch_servers(key).await {
                Ok(batch) => {
                    if batch.is_empty() {
                        warn!("No servers found for key {masked}");
                    } else {
                        info!("Found {} server(s) for key {masked}", batch.len());
                    }
                    report.keys.push(KeyReport {
                        key: masked,
                        servers: batch.len(),
                        error: None,
                    });
                    servers.extend(batch);
                }
                Err(err) => {
                    // One key failing never aborts the run.
                    error!("Skipping key {masked}: {err}");
                    report.keys.push(KeyReport {
                        key: masked,
                        servers: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        servers
    }

    /// Creates the destination vault when it does not exist yet.
    ///
    /// The check-then-create pair is only safe because a run is
    /// single-threaded; parallel callers would have to serialize it.
    fn ensure_vault(&self, name: &str) -> Result<(), SyncError> {
        match self.vault.exists(name) {
            Ok(true) => {
                debug!("Vault {name} exists");
                Ok(())
            }
            Ok(false) => {
                info!("Creating vault {name}");
                self.vault
                    .create_vault(name)
                    .map_err(|err| SyncError::VaultCreateFailed(err.to_string()))
            }
            Err(err) => Err(SyncError::VaultCreateFailed(err.to_string())),
        }
    }
}

/// Masks a credential key down to its first four characters for logging.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{visible}\u{2026}")
}
