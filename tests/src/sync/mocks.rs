//! Scripted stand-ins for the provider API and the vault, so the
//! orchestrator can be exercised without a network or an `op` binary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aeza1password_common::model::Server;
use aeza1password_core::api::{ApiError, ServerSource};
use aeza1password_core::record::CredentialRecord;
use aeza1password_core::vault::{Vault, VaultError};
use async_trait::async_trait;

/// What one credential key should yield.
pub enum KeyBehavior {
    Servers(Vec<Server>),
    RemoteError(String),
    NetworkError(String),
}

/// Provider source answering from a fixed script; unknown keys yield an
/// empty batch.
pub struct ScriptedSource {
    pub behaviors: HashMap<String, KeyBehavior>,
}

#[async_trait]
impl ServerSource for ScriptedSource {
    async fn fetch_servers(&self, api_key: &str) -> Result<Vec<Server>, ApiError> {
        match self.behaviors.get(api_key) {
            Some(KeyBehavior::Servers(servers)) => Ok(servers.clone()),
            Some(KeyBehavior::RemoteError(message)) => Err(ApiError::Remote(message.clone())),
            Some(KeyBehavior::NetworkError(message)) => Err(ApiError::Network(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Every call the orchestrator made against the vault.
#[derive(Default)]
pub struct VaultLog {
    pub exists_calls: usize,
    pub created_vaults: Vec<String>,
    pub items: Vec<(String, CredentialRecord)>,
}

/// Vault double recording calls into a shared log.
pub struct RecordingVault {
    /// Whether the destination vault already exists.
    pub present: bool,
    pub fail_create_vault: bool,
    /// Item titles whose creation should fail.
    pub failing_titles: Vec<String>,
    pub log: Arc<Mutex<VaultLog>>,
}

impl RecordingVault {
    pub fn new(present: bool) -> (Self, Arc<Mutex<VaultLog>>) {
        let log = Arc::new(Mutex::new(VaultLog::default()));
        let vault = Self {
            present,
            fail_create_vault: false,
            failing_titles: Vec::new(),
            log: log.clone(),
        };
        (vault, log)
    }
}

impl Vault for RecordingVault {
    fn exists(&self, _name: &str) -> Result<bool, VaultError> {
        self.log.lock().unwrap().exists_calls += 1;
        Ok(self.present)
    }

    fn create_vault(&self, name: &str) -> Result<(), VaultError> {
        if self.fail_create_vault {
            return Err(VaultError::Command("vault creation denied".to_string()));
        }
        self.log.lock().unwrap().created_vaults.push(name.to_string());
        Ok(())
    }

    fn create_item(&self, name: &str, record: &CredentialRecord) -> Result<(), VaultError> {
        if self.failing_titles.contains(&record.title) {
            return Err(VaultError::Command("item rejected".to_string()));
        }
        self.log
            .lock()
            .unwrap()
            .items
            .push((name.to_string(), record.clone()));
        Ok(())
    }
}
