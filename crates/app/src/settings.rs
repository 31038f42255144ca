//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter applied to all workspace crates.
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
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
    /// Open-day snapshot blob; defaults to `current_day.json`.
    pub snapshot_path: Option<String>,
    /// Directory for end-of-day report files; defaults to `reports`.
    pub reports_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    pub server: String,
    pub username: String,
    pub password: String,
    /// Telegram user ids allowed to talk to the bot; empty means everyone.
    #[serde(default)]
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    pub telegram: Option<Telegram>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
