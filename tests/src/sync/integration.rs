#![cfg(test)]
use std::collections::HashMap;

use aeza1password_common::config::Config;
use aeza1password_common::model::{IpAddress, Location, OperatingSystem, Server};
use aeza1password_core::sync::{SyncError, SyncService};

use super::mocks::{KeyBehavior, RecordingVault, ScriptedSource};

fn server(id: i64, name: &str) -> Server {
    Server {
        service_id: id,
        name: name.to_string(),
        ip_addresses: vec![IpAddress {
            address: "192.0.2.10".to_string(),
            domain: None,
        }],
        admin_username: "root".to_string(),
        admin_password: "hunter2".to_string(),
        location: Location::new("NL").unwrap(),
        os: OperatingSystem::from_id(940),
        cpu_count: 2,
        ram_gb: 4,
        storage_gb: 40,
        email: None,
    }
}

fn config(dry_run: bool) -> Config {
    Config {
        dry_run,
        vault: "Aeza".to_string(),
    }
}

fn scripted(behaviors: Vec<(&str, KeyBehavior)>) -> ScriptedSource {
    ScriptedSource {
        behaviors: behaviors
            .into_iter()
            .map(|(key, behavior)| (key.to_string(), behavior))
            .collect(),
    }
}

/// A failing key is skipped; the remaining keys still sync.
#[tokio::test]
async fn key_failure_does_not_abort_the_run() {
    let source = scripted(vec![
        ("bad-key", KeyBehavior::RemoteError("invalid key".to_string())),
        ("good-key", KeyBehavior::Servers(vec![server(1, "web-01")])),
    ]);
    let (vault, log) = RecordingVault::new(true);
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["bad-key".to_string(), "good-key".to_string()];
    let report = service.run(&keys, &config(false)).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.keys.len(), 2);
    assert_eq!(report.keys[0].error.as_deref(), Some("remote error: invalid key"));
    assert_eq!(report.keys[1].servers, 1);
    assert_eq!(log.lock().unwrap().items.len(), 1);
}

/// Aggregation preserves key order, then per-key order.
#[tokio::test]
async fn servers_are_aggregated_in_input_order() {
    let source = scripted(vec![
        (
            "first",
            KeyBehavior::Servers(vec![server(1, "alpha"), server(2, "beta")]),
        ),
        ("second", KeyBehavior::Servers(vec![server(3, "gamma")])),
    ]);
    let (vault, log) = RecordingVault::new(true);
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["first".to_string(), "second".to_string()];
    let report = service.run(&keys, &config(false)).await.unwrap();

    let titles: Vec<&str> = report
        .records
        .iter()
        .map(|record| record.title.as_str())
        .collect();
    assert_eq!(
        titles,
        [
            "alpha \u{1F1F3}\u{1F1F1}",
            "beta \u{1F1F3}\u{1F1F1}",
            "gamma \u{1F1F3}\u{1F1F1}",
        ]
    );
    assert_eq!(log.lock().unwrap().items.len(), 3);
}

/// Zero servers across every key is terminal, before any vault call.
#[tokio::test]
async fn empty_aggregate_fails_without_vault_calls() {
    let source = scripted(vec![
        ("one", KeyBehavior::Servers(Vec::new())),
        ("two", KeyBehavior::NetworkError("timed out".to_string())),
    ]);
    let (vault, log) = RecordingVault::new(true);
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["one".to_string(), "two".to_string()];
    let err = service.run(&keys, &config(false)).await.unwrap_err();

    // The failure still carries what each key yielded.
    let key_reports = match err {
        SyncError::NoServersFound { keys } => keys,
        other => panic!("expected NoServersFound, got {other:?}"),
    };
    assert_eq!(key_reports.len(), 2);
    assert_eq!(key_reports[0].servers, 0);
    assert_eq!(key_reports[0].error, None);
    assert_eq!(
        key_reports[1].error.as_deref(),
        Some("network error: timed out")
    );

    let log = log.lock().unwrap();
    assert_eq!(log.exists_calls, 0);
    assert!(log.created_vaults.is_empty());
    assert!(log.items.is_empty());
}

/// Dry-run touches nothing but builds exactly what a real run submits.
#[tokio::test]
async fn dry_run_matches_real_submission() {
    let behaviors = || {
        scripted(vec![(
            "key",
            KeyBehavior::Servers(vec![server(7, "web-07")]),
        )])
    };
    let keys = vec!["key".to_string()];

    let (dry_vault, dry_log) = RecordingVault::new(true);
    let dry_service = SyncService::new(Box::new(behaviors()), Box::new(dry_vault));
    let dry_report = dry_service.run(&keys, &config(true)).await.unwrap();

    {
        let log = dry_log.lock().unwrap();
        assert_eq!(log.exists_calls, 0);
        assert!(log.created_vaults.is_empty());
        assert!(log.items.is_empty());
    }
    assert_eq!(dry_report.records.len(), 1);
    assert_eq!(dry_report.created, 0);

    let (real_vault, real_log) = RecordingVault::new(true);
    let real_service = SyncService::new(Box::new(behaviors()), Box::new(real_vault));
    let real_report = real_service.run(&keys, &config(false)).await.unwrap();

    assert_eq!(real_report.created, 1);
    let submitted = &real_log.lock().unwrap().items[0];
    assert_eq!(submitted.0, "Aeza");
    assert_eq!(submitted.1, dry_report.records[0]);
}

/// An absent vault is created once before any item lands in it.
#[tokio::test]
async fn missing_vault_is_created() {
    let source = scripted(vec![(
        "key",
        KeyBehavior::Servers(vec![server(1, "web-01")]),
    )]);
    let (vault, log) = RecordingVault::new(false);
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["key".to_string()];
    service.run(&keys, &config(false)).await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.created_vaults, ["Aeza"]);
    assert_eq!(log.items.len(), 1);
}

/// Vault creation failure aborts before any item is created.
#[tokio::test]
async fn vault_create_failure_is_terminal() {
    let source = scripted(vec![(
        "key",
        KeyBehavior::Servers(vec![server(1, "web-01")]),
    )]);
    let (mut vault, log) = RecordingVault::new(false);
    vault.fail_create_vault = true;
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["key".to_string()];
    let err = service.run(&keys, &config(false)).await.unwrap_err();

    assert!(matches!(err, SyncError::VaultCreateFailed(_)));
    assert!(log.lock().unwrap().items.is_empty());
}

/// One rejected item never sinks the rest of the batch.
#[tokio::test]
async fn item_failure_is_best_effort() {
    let source = scripted(vec![(
        "key",
        KeyBehavior::Servers(vec![server(1, "web-01"), server(2, "web-02")]),
    )]);
    let (mut vault, log) = RecordingVault::new(true);
    vault.failing_titles = vec!["web-01 \u{1F1F3}\u{1F1F1}".to_string()];
    let service = SyncService::new(Box::new(source), Box::new(vault));

    let keys = vec!["key".to_string()];
    let report = service.run(&keys, &config(false)).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.records.len(), 2);
    let log = log.lock().unwrap();
    assert_eq!(log.items.len(), 1);
    assert_eq!(log.items[0].1.title, "web-02 \u{1F1F3}\u{1F1F1}");
}
