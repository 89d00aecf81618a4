use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "mandi-server", about = "Street-food supply marketplace API")]
pub struct Cli {
    /// Interface to bind.
    #[arg(long, env = "MANDI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON array of vendor records served at /api/vendors
    /// (default: the built-in list).
    #[arg(long, env = "MANDI_VENDORS_FILE")]
    pub vendors_file: Option<PathBuf>,

    /// JSON file backing the free-form items collection (default: in memory).
    #[arg(long, env = "MANDI_ITEMS_FILE")]
    pub items_file: Option<PathBuf>,

    /// Marketplace snapshot, loaded at startup and rewritten after every change.
    #[arg(long, env = "MANDI_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Start with an empty catalog instead of the demo products.
    #[arg(long, env = "MANDI_NO_SEED")]
    pub no_seed: bool,
}

impl Cli {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
