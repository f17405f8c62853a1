//! # Aeza API Client
//!
//! Fetches the service list for one credential key and maps the raw JSON
//! records into the canonical [`Server`] model.
//!
//! **Architectural Note:**
//! The orchestrator depends on the [`ServerSource`] abstraction rather
//! than this concrete client, so sync logic stays testable without a
//! network.

use std::collections::HashMap;
use std::time::Duration;

use aeza1password_common::model::os::{self, OsCatalog};
use aeza1password_common::model::{IpAddress, Location, OperatingSystem, Server};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Base URL of the Aeza customer API.
pub const AEZA_ENDPOINT: &str = "https://my.aeza.net/api";

const API_KEY_HEADER: &str = "X-API-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Product type marking a billable virtual server; every other product
/// type is dropped from the service list.
const VPS_PRODUCT_TYPE: &str = "vps";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or timeout talking to the provider.
    #[error("network error: {0}")]
    Network(String),
    /// The provider answered with an error envelope.
    #[error("remote error: {0}")]
    Remote(String),
    /// One service record was missing an expected field.
    #[error("malformed service record: {0}")]
    MalformedRecord(String),
}

/// Source of server records for one credential key.
#[async_trait]
pub trait ServerSource: Send + Sync {
    async fn fetch_servers(&self, api_key: &str) -> Result<Vec<Server>, ApiError>;
}

/// Response envelope shared by the `/services` and `/os` endpoints.
#[derive(Deserialize)]
struct Envelope {
    data: Option<Items>,
    error: Option<RemoteError>,
}

#[derive(Deserialize)]
struct Items {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct RemoteError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawService {
    id: i64,
    name: String,
    #[serde(default)]
    ipv4: Vec<RawIp>,
    #[serde(default)]
    ipv6: Vec<RawIp>,
    location_code: String,
    parameters: RawParameters,
    secure_parameters: RawSecureParameters,
    summary_configuration: RawSummary,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct RawIp {
    address: String,
    #[serde(default)]
    domain: Option<String>,
}

#[derive(Deserialize)]
struct RawParameters {
    os: i64,
}

#[derive(Deserialize)]
struct RawSecureParameters {
    data: RawAdminAccount,
}

#[derive(Deserialize)]
struct RawAdminAccount {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RawSummary {
    cpu: RawCount,
    ram: RawCount,
    storage: RawCount,
}

#[derive(Deserialize)]
struct RawCount {
    count: u32,
}

/// HTTP client for the Aeza customer API.
pub struct AezaClient {
    http: Client,
    endpoint: String,
}

impl AezaClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_endpoint(AEZA_ENDPOINT)
    }

    /// Builds a client against a non-default endpoint.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .use_rustls_tls()
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Single GET with the key in the API-key header; one attempt, fixed
    /// timeout, no retry.
    async fn get(&self, path: &str, api_key: &str) -> Result<Envelope, ApiError> {
        let url = format!("{}/{path}", self.endpoint);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        response
            .json::<Envelope>()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    /// Fetches a fresh OS id→name mapping from the provider's catalog.
    pub async fn fetch_operating_systems(
        &self,
        api_key: &str,
    ) -> Result<HashMap<i64, String>, ApiError> {
        debug!("Getting operating systems from aeza.net");
        let envelope = self.get("os", api_key).await?;
        Ok(os_names_from_items(unwrap_items(envelope)?))
    }

    /// Retries name resolution through the live catalog for servers whose
    /// OS id the static table does not know.
    async fn resolve_unknown_os(&self, api_key: &str, servers: &mut [Server]) {
        let catalog = LiveCatalog {
            client: self,
            api_key,
        };
        for server in servers.iter_mut().filter(|s| s.os.name.is_none()) {
            server.os.name = os::resolve_name(server.os.id, Some(&catalog)).await;
        }
    }
}

#[async_trait]
impl ServerSource for AezaClient {
    async fn fetch_servers(&self, api_key: &str) -> Result<Vec<Server>, ApiError> {
        let envelope = self.get("services", api_key).await?;
        let items = unwrap_items(envelope)?;

        let mut servers = Vec::new();
        for item in items {
            if !is_virtual_server(&item) {
                debug!("Skipping non-server product");
                continue;
            }
            match map_service(item) {
                Ok(server) => servers.push(server),
                // A malformed record sinks only itself; the rest of the
                // batch proceeds.
                Err(err) => warn!("Skipping service: {err}"),
            }
        }

        self.resolve_unknown_os(api_key, &mut servers).await;
        Ok(servers)
    }
}

/// Live OS catalog bound to one client and key.
struct LiveCatalog<'a> {
    client: &'a AezaClient,
    api_key: &'a str,
}

#[async_trait]
impl OsCatalog for LiveCatalog<'_> {
    async fn fetch(&self) -> anyhow::Result<HashMap<i64, String>> {
        Ok(self
            .client
            .fetch_operating_systems(self.api_key)
            .await?)
    }
}

/// Unwraps the response envelope, turning a remote error payload into
/// [`ApiError::Remote`].
fn unwrap_items(envelope: Envelope) -> Result<Vec<Value>, ApiError> {
    if let Some(error) = envelope.error {
        return Err(ApiError::Remote(error.message));
    }
    Ok(envelope.data.map(|data| data.items).unwrap_or_default())
}

fn os_names_from_items(items: Vec<Value>) -> HashMap<i64, String> {
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(Value::as_i64)?;
            let name = item.get("name").and_then(Value::as_str)?;
            Some((id, name.to_string()))
        })
        .collect()
}

fn is_virtual_server(item: &Value) -> bool {
    item.pointer("/product/type").and_then(Value::as_str) == Some(VPS_PRODUCT_TYPE)
}

/// Maps one raw service record into a [`Server`].
///
/// All IPv4 entries plus the first IPv6 entry are merged into the address
/// list, preserving provider order. OS names come from the static table
/// here; unknown ids are resolved against the live catalog afterwards.
fn map_service(raw: Value) -> Result<Server, ApiError> {
    let service: RawService =
        serde_json::from_value(raw).map_err(|err| ApiError::MalformedRecord(err.to_string()))?;

    let mut ip_addresses: Vec<IpAddress> = service
        .ipv4
        .into_iter()
        .map(|ip| IpAddress {
            address: ip.address,
            domain: ip.domain,
        })
        .collect();
    if let Some(ip) = service.ipv6.into_iter().next() {
        ip_addresses.push(IpAddress {
            address: ip.address,
            domain: ip.domain,
        });
    }

    let location = Location::new(&service.location_code)
        .map_err(|err| ApiError::MalformedRecord(err.to_string()))?;

    Ok(Server {
        service_id: service.id,
        name: service.name,
        ip_addresses,
        admin_username: service.secure_parameters.data.username,
        admin_password: service.secure_parameters.data.password,
        location,
        os: OperatingSystem::from_id(service.parameters.os),
        cpu_count: service.summary_configuration.cpu.count,
        ram_gb: service.summary_configuration.ram.count,
        storage_gb: service.summary_configuration.storage.count,
        email: service.email,
    })
}
