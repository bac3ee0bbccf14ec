use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::Roster;

pub const DEFAULT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub roster_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".into(),
            roster_path: None,
            log_filter: "warn".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    roster_path: Option<PathBuf>,
    log_filter: Option<String>,
}

/// Defaults, then `client.toml` (if present), then environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if config_path.is_some() => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file.roster_path {
        settings.roster_path = Some(v);
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("GAME_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__ROSTER_PATH") {
        settings.roster_path = Some(PathBuf::from(v));
    }
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

/// Built-in circus roster unless a `[[suspects]]` TOML file is configured.
pub fn load_roster(path: Option<&Path>) -> anyhow::Result<Roster> {
    let Some(path) = path else {
        return Ok(Roster::circus());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster '{}'", path.display()))?;
    parse_roster(&raw).with_context(|| format!("invalid roster '{}'", path.display()))
}

fn parse_roster(raw: &str) -> anyhow::Result<Roster> {
    Ok(toml::from_str::<Roster>(raw)?)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
