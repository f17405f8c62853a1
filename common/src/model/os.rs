//! # Operating System Lookup
//!
//! Aeza's API reports an operating system as a bare numeric id. The known
//! ids live in a static table; ids the table misses can be resolved
//! through an optional live fetch of the provider's OS catalog.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tracing::warn;

/// Known Aeza OS ids and their display names.
///
/// If this table goes out of date, the missing entries can be read from
/// the `/os` catalog endpoint with any valid API key.
pub const OPERATING_SYSTEMS: &[(i64, &str)] = &[
    (940, "Ubuntu 22.04"),
    (939, "Ubuntu 20.04"),
    (938, "Ubuntu 18.04"),
    (942, "CentOS 8 Stream"),
    (941, "CentOS 7"),
    (1991, "Debian 12"),
    (937, "Debian 11"),
    (936, "Debian 10"),
    (935, "Debian 9"),
    (929, "Windows Server 2012"),
    (930, "Windows Server 2016"),
    (931, "Windows Server 2019"),
    (1139, "Windows Server 2022"),
    (166, "FreeBSD 12"),
    (944, "Alma Linux 8"),
    (948, "Astra Linux CE"),
    (946, "Rocky Linux 8"),
    (947, "Rocky Linux 9"),
];

/// Source of a fresh id→name OS mapping, typically the provider API.
#[async_trait]
pub trait OsCatalog: Sync {
    async fn fetch(&self) -> anyhow::Result<HashMap<i64, String>>;
}

/// Looks up an OS id in the static table.
pub fn lookup(id: i64) -> Option<&'static str> {
    OPERATING_SYSTEMS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
}

/// Resolves an OS id to a display name.
///
/// Falls back to fetching the live catalog once when the static table
/// misses and a fetcher is supplied. Returns `None` when the id stays
/// unknown; callers render the raw id instead.
pub async fn resolve_name(id: i64, live: Option<&dyn OsCatalog>) -> Option<String> {
    if let Some(name) = lookup(id) {
        return Some(name.to_string());
    }

    let catalog = live?;
    match catalog.fetch().await {
        Ok(names) => {
            let name = names.get(&id).cloned();
            if name.is_none() {
                warn!("Operating system {id} not found in live catalog");
            }
            name
        }
        Err(err) => {
            warn!("Failed to fetch OS catalog: {err}");
            None
        }
    }
}

/// One operating system as attached to a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingSystem {
    pub id: i64,
    /// Resolved display name; `None` when the id is unknown.
    pub name: Option<String>,
}

impl OperatingSystem {
    /// Builds an OS from its id, resolving the name from the static table.
    pub fn from_id(id: i64) -> Self {
        Self {
            id,
            name: lookup(id).map(str::to_string),
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.id),
        }
    }
}
