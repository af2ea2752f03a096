use crate::domain_model::PageSize;
use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub storage: Storage,
    pub feed: Feed,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub backend: String, // "file" or "memory"
    pub dir: String,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
    pub page_size: PageSize,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Load settings from `path` (or the build's default file), then apply
/// `STANCELINE__SECTION__KEY` environment overrides.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("STANCELINE").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    if settings.feed.page_size.0 == 0 {
        return Err(anyhow!("feed.page_size must be positive"));
    }

    Ok(settings)
}
