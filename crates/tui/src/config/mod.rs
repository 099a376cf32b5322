use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/portal.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Prefills the login form.
    pub username: String,
    pub log_level: String,
    pub log_file: String,
    /// Simulated latency of the in-memory login provider.
    pub auth_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            username: String::new(),
            log_level: "info".to_string(),
            log_file: "bank_portal.log".to_string(),
            auth_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bank_portal_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL of the account API (e.g. http://localhost:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override the simulated login delay in milliseconds.
    #[arg(long)]
    auth_delay_ms: Option<u64>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BANK_PORTAL"));
    let settings: AppConfig = builder.build()?.try_deserialize()?;

    Ok(apply_overrides(settings, args))
}

fn apply_overrides(mut settings: AppConfig, args: Args) -> AppConfig {
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(auth_delay_ms) = args.auth_delay_ms {
        settings.auth_delay_ms = auth_delay_ms;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.auth_delay_ms, 1000);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "base_url = \"http://bank.internal:9000\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.base_url, "http://bank.internal:9000");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn cli_flags_override_every_key() {
        let args = Args::parse_from([
            "bank_portal_tui",
            "--base-url",
            "http://bank.internal:9000",
            "--username",
            "john.doe",
            "--log-level",
            "debug",
            "--log-file",
            "portal.log",
            "--auth-delay-ms",
            "0",
        ]);

        let settings = apply_overrides(AppConfig::default(), args);
        assert_eq!(settings.base_url, "http://bank.internal:9000");
        assert_eq!(settings.username, "john.doe");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.log_file, "portal.log");
        assert_eq!(settings.auth_delay_ms, 0);
    }
}
