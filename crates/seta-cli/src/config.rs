use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use seta_core::dates::{default_earliest_date, parse_selected_date};

pub const ENV_BASE_URL: &str = "SETA_BASE_URL";
pub const ENV_DATA_DIR: &str = "SETA_DATA_DIR";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8157";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
    pub earliest_date: NaiveDate,
}

/// Where the three data endpoints are read from. A data directory, when
/// set, takes precedence over the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub data_dir: Option<PathBuf>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayConfig {
    pub hide_optional: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                data_dir: None,
                timeout: Duration::from_secs(30),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "console".to_string(),
            },
            display: DisplayConfig::default(),
            earliest_date: default_earliest_date(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.source.data_dir.is_none() {
            let url = self.source.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("source.base_url must start with http:// or https://".into());
            }
        }
        if self.source.timeout.is_zero() {
            return Err("source.timeout_ms must be greater than 0".into());
        }
        match self.logging.level.to_lowercase().trim() {
            "debug" | "info" | "warn" | "error" => {}
            _ => return Err("logging.level must be one of debug, info, warn, error".into()),
        }
        match self.logging.format.to_lowercase().trim() {
            "console" | "json" => {}
            _ => return Err("logging.format must be one of console, json".into()),
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    source: PartialSourceConfig,
    #[serde(default)]
    logging: PartialLoggingConfig,
    #[serde(default)]
    display: PartialDisplayConfig,
    #[serde(default)]
    earliest_date: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSourceConfig {
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    data_dir: String,
    #[serde(default)]
    timeout_ms: u64,
}

#[derive(Debug, Default, Deserialize)]
struct PartialLoggingConfig {
    #[serde(default)]
    level: String,
    #[serde(default)]
    format: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialDisplayConfig {
    #[serde(default)]
    hide_optional: Option<bool>,
    #[serde(default)]
    color: Option<bool>,
}

/// Load config with precedence defaults < config file < environment.
///
/// An explicit `config_file` must be readable; the default location is
/// skipped silently when missing.
pub fn load_config(config_file: Option<&str>) -> Result<(Config, Option<PathBuf>), String> {
    let mut cfg = Config::default();

    let explicit = config_file
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let (path_to_try, used) = if let Some(path) = explicit {
        (Some(path), true)
    } else {
        (default_config_path(), false)
    };

    let mut loaded = None;
    if let Some(path) = path_to_try {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let parsed: PartialConfig =
                    serde_yaml::from_str(&text).map_err(|err| format!("parse config: {err}"))?;
                apply_partial(&mut cfg, parsed)?;
                loaded = Some(path);
            }
            Err(err) => {
                if used {
                    return Err(format!("failed to load config file: {err}"));
                }
            }
        }
    }

    apply_env(&mut cfg, |key| std::env::var(key).ok())?;
    Ok((cfg, loaded))
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("seta").join("config.yaml"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(
                PathBuf::from(home)
                    .join(".config")
                    .join("seta")
                    .join("config.yaml"),
            );
        }
    }
    None
}

fn apply_partial(cfg: &mut Config, partial: PartialConfig) -> Result<(), String> {
    if !partial.source.base_url.trim().is_empty() {
        cfg.source.base_url = partial.source.base_url.trim().to_string();
    }
    if !partial.source.data_dir.trim().is_empty() {
        cfg.source.data_dir = Some(expand_tilde(partial.source.data_dir.trim())?);
    }
    if partial.source.timeout_ms > 0 {
        cfg.source.timeout = Duration::from_millis(partial.source.timeout_ms);
    }
    if !partial.logging.level.trim().is_empty() {
        cfg.logging.level = partial.logging.level.trim().to_string();
    }
    if !partial.logging.format.trim().is_empty() {
        cfg.logging.format = partial.logging.format.trim().to_string();
    }
    if let Some(hide) = partial.display.hide_optional {
        cfg.display.hide_optional = hide;
    }
    if let Some(color) = partial.display.color {
        cfg.display.color = color;
    }
    if !partial.earliest_date.trim().is_empty() {
        cfg.earliest_date = parse_selected_date(&partial.earliest_date)
            .map_err(|err| format!("earliest_date: {err}"))?;
    }
    Ok(())
}

fn apply_env(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> Result<(), String> {
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        cfg.source.base_url = url.trim().to_string();
    }
    if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
        cfg.source.data_dir = Some(expand_tilde(dir.trim())?);
    }
    Ok(())
}

fn expand_tilde(input: &str) -> Result<PathBuf, String> {
    if input == "~" {
        let home = std::env::var("HOME").map_err(|_| "failed to resolve HOME".to_string())?;
        return Ok(PathBuf::from(home));
    }
    if let Some(rest) = input.strip_prefix("~/") {
        let home = std::env::var("HOME").map_err(|_| "failed to resolve HOME".to_string())?;
        return Ok(PathBuf::from(home).join(rest));
    }
    Ok(Path::new(input).to_path_buf())
}
