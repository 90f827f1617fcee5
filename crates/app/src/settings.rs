//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden with `WALLETBOOK__*` environment
//! variables (e.g. `WALLETBOOK__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "walletbook")]
struct Args {
    /// Settings file, without or with its extension.
    #[arg(long, env = "WALLETBOOK_SETTINGS", default_value = "settings")]
    settings: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Local directory where uploaded images land, and the URL it is served from.
#[derive(Debug, Deserialize)]
pub struct Uploads {
    pub root: String,
    pub public_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub uploads: Option<Uploads>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let settings = Config::builder()
            .add_source(File::with_name(&args.settings))
            .add_source(
                Environment::with_prefix("WALLETBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
