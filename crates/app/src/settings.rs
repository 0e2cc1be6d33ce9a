//! Handles settings for the application. Configuration is written in
//! `settings.toml`, every key can be overridden with a `PANTRY_` prefixed
//! environment variable (`PANTRY_SERVER__PORT=8080`).
//!
//! See `settings.example.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Ingredient stock tracking backend")]
pub struct Cli {
    /// Settings file, with or without the `.toml` extension.
    #[arg(short, long, env = "PANTRY_CONFIG", default_value = "settings")]
    pub config: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
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

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("PANTRY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
    }

    #[test]
    fn sqlite_server_section() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 3000
            database = { sqlite = "pantry.db" }
            "#,
        );

        let server = settings.server.unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(server.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, 3000);
        assert_eq!(server.database, Database::Sqlite("pantry.db".to_string()));
    }

    #[test]
    fn memory_database() {
        let settings = from_toml(
            r#"
            [server]
            port = 8080
            database = "memory"
            "#,
        );

        let server = settings.server.unwrap();
        assert_eq!(server.bind, None);
        assert_eq!(server.database, Database::Memory);
    }

    #[test]
    fn cli_defaults_to_settings_file() {
        let cli = Cli::parse_from(["pantry"]);
        assert_eq!(cli.config, "settings");

        let cli = Cli::parse_from(["pantry", "--config", "/etc/pantry/settings.toml"]);
        assert_eq!(cli.config, "/etc/pantry/settings.toml");
    }
}
