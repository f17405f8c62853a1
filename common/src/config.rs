pub struct Config {
    /// Print the would-be `op` commands instead of touching the vault.
    ///
    /// Does not stop the sync from fetching servers over the network.
    pub dry_run: bool,
    /// Name of the destination 1Password vault.
    pub vault: String,
}
