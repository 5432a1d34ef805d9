use anyhow::Context;
use liga_api::client::DEFAULT_BASE_URL;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted form of the settings; every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub api_url: Option<String>,
    pub full_screen: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub api_url: String,
    pub full_screen: bool,
    pub log_level: LevelFilter,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            full_screen: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppSettings {
    /// Defaults, then the settings file, then `LIGA_API_URL` / `LIGA_LOG_LEVEL`.
    /// Command-line overrides are applied by the caller.
    pub fn load() -> Self {
        let mut settings = Self::default();
        match read_settings_file(&settings_path()) {
            Ok(Some(file)) => settings.apply_file(file),
            Ok(None) => {}
            Err(e) => log::warn!("ignoring settings file: {e:#}"),
        }
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn apply_file(&mut self, file: SettingsFile) {
        if let Some(url) = file.api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(full_screen) = file.full_screen {
            self.full_screen = full_screen;
        }
        if let Some(level) = file.log_level.as_deref().and_then(parse_level) {
            self.log_level = level;
        }
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("LIGA_API_URL").filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(level) = var("LIGA_LOG_LEVEL").as_deref().and_then(parse_level) {
            self.log_level = level;
        }
    }

    /// Persists the full-screen toggle. Every other key in the file is left
    /// as it was, so env and command-line overrides stay one-off.
    pub fn save(&self) -> anyhow::Result<()> {
        write_full_screen(&settings_path(), self.full_screen)
    }
}

fn write_full_screen(path: &Path, full_screen: bool) -> anyhow::Result<()> {
    let mut file = read_settings_file(path)?.unwrap_or_default();
    file.full_screen = Some(full_screen);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {} failed", parent.display()))?;
    }
    let payload = serde_json::to_string_pretty(&file).context("serialize settings failed")?;
    std::fs::write(path, payload).with_context(|| format!("write {} failed", path.display()))
}

pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse::<LevelFilter>().ok()
}

/// `Ok(None)` when there is no settings file yet.
fn read_settings_file(path: &Path) -> anyhow::Result<Option<SettingsFile>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("{}: read failed", path.display())),
    };
    serde_json::from_str(&content)
        .map(Some)
        .with_context(|| format!("{}: invalid settings json", path.display()))
}

fn settings_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("liga-tui").join("settings.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("liga-tui").join("settings.json");
    }
    PathBuf::from("liga-tui-settings.json")
}
