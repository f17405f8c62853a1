use super::location::Location;
use super::os::OperatingSystem;

/// One IP address attached to a server, with its reverse domain when the
/// provider reports one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAddress {
    pub address: String,
    pub domain: Option<String>,
}

/// The canonical unit of sync: one virtual server as fetched from one
/// provider account.
///
/// `service_id` is unique within one account. A record with zero
/// resolvable addresses still syncs, just with an empty address block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub service_id: i64,
    pub name: String,
    /// IPv4 addresses in provider order, followed by the first IPv6.
    pub ip_addresses: Vec<IpAddress>,
    pub admin_username: String,
    pub admin_password: String,
    pub location: Location,
    pub os: OperatingSystem,
    pub cpu_count: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
    pub email: Option<String>,
}
