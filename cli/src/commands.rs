use clap::Parser;

#[derive(Parser)]
#[command(name = "aeza1password")]
#[command(about = "Sync servers from aeza.net into a 1Password vault.")]
pub struct CommandLine {
    /// Aeza API keys to sync, in order
    #[arg(conflicts_with = "env")]
    pub keys: Vec<String>,

    /// Load API keys from the APIKEY environment variable (comma-separated)
    #[arg(short, long)]
    pub env: bool,

    /// Print the would-be op commands without touching the vault
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Destination vault name
    #[arg(long, default_value = "Aeza")]
    pub vault: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
