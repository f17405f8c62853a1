mod commands;
mod keys;
mod terminal;

use aeza1password_common::config::Config;
use aeza1password_core::api::AezaClient;
use aeza1password_core::sync::{SyncError, SyncService};
use aeza1password_core::vault::{self, OpCli};
use commands::CommandLine;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init(commands.debug);
    debug!("Starting aeza1password");

    let api_keys = keys::resolve(&commands)?;
    debug!("Loaded {} API key(s)", api_keys.len());

    let cfg = Config {
        dry_run: commands.dry_run,
        vault: commands.vault,
    };

    if cfg.dry_run {
        debug!("Dry-run: skipping 1Password CLI checks");
    } else {
        vault::ensure_op_ready()?;
    }

    let client = AezaClient::new()?;
    let service = SyncService::new(Box::new(client), Box::new(OpCli));
    let report = match service.run(&api_keys, &cfg).await {
        Ok(report) => report,
        Err(err) => {
            if let SyncError::NoServersFound { keys } = &err {
                for key in keys {
                    match &key.error {
                        Some(reason) => warn!("{}: skipped ({reason})", key.key),
                        None => warn!("{}: 0 server(s)", key.key),
                    }
                }
            }
            return Err(err.into());
        }
    };

    for key in &report.keys {
        match &key.error {
            Some(err) => warn!("{}: skipped ({err})", key.key),
            None => info!("{}: {} server(s)", key.key, key.servers),
        }
    }
    if cfg.dry_run {
        info!(
            "Dry-run complete: {} item(s) would be created",
            report.records.len()
        );
    } else {
        info!(
            "Sync complete: {} created, {} failed, {} total",
            report.created, report.failed, report.total
        );
    }

    Ok(())
}
