//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into the `AppConfig` DTO and layers environment
//! overrides on top. No validation and no defaults here: empty values are
//! facts, and wiring decides what they mean.
//!
//! 仅纯数据加载。默认值与校验由 wiring 决定。

use anyhow::Context;
use el_core::config::AppConfig;
use std::path::{Path, PathBuf};

pub const ENV_SUPABASE_URL: &str = "EXTLINK_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "EXTLINK_SUPABASE_ANON_KEY";
pub const ENV_EXTENSION_ID: &str = "EXTLINK_EXTENSION_ID";
pub const ENV_BRIDGE: &str = "EXTLINK_BRIDGE";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields an empty config.
pub fn load_config_or_empty(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        ::tracing::debug!(path = %config_path.display(), "no config file, using empty config");
        return Ok(AppConfig::empty());
    }
    load_config(config_path.to_path_buf())
}

/// Overlay non-empty environment values onto `config`.
///
/// `lookup` is `std::env::var(..).ok()` in production.
pub fn apply_env_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = non_empty(ENV_SUPABASE_URL) {
        config.supabase_url = url;
    }
    if let Some(key) = non_empty(ENV_SUPABASE_ANON_KEY) {
        config.supabase_anon_key = key;
    }
    if let Some(address) = non_empty(ENV_EXTENSION_ID) {
        config.extension_address = address;
    }
    if let Some(bridge) = non_empty(ENV_BRIDGE) {
        config.bridge_command = PathBuf::from(bridge);
    }
    config
}
