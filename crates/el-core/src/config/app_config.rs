use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Hosted backend base URL (may be empty)
    pub supabase_url: String,

    /// Publishable API key sent as `apikey`
    pub supabase_anon_key: String,

    /// Public origin of the site, used for sign-in redirects
    pub site_url: String,

    /// Extension address override (empty means the built-in default)
    pub extension_address: String,

    /// Bridge executable used to reach the extension (empty means none)
    pub bridge_command: PathBuf,

    /// Delivery timeout in milliseconds (0 means the built-in default)
    pub delivery_timeout_ms: u64,

    /// Session file written by the sign-in callback (empty means the default location)
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            supabase_url: str_at("supabase", "url"),
            supabase_anon_key: str_at("supabase", "anon_key"),
            site_url: str_at("supabase", "site_url"),
            extension_address: str_at("extension", "address"),
            bridge_command: PathBuf::from(str_at("extension", "bridge_command")),
            delivery_timeout_ms: toml_value
                .get("extension")
                .and_then(|e| e.get("delivery_timeout_ms"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
            session_file: PathBuf::from(str_at("session", "file")),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            site_url: String::new(),
            extension_address: String::new(),
            bridge_command: PathBuf::new(),
            delivery_timeout_ms: 0,
            session_file: PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_maps_every_section() {
        let value: toml::Value = toml::from_str(
            r#"
            [supabase]
            url = "https://project.supabase.co"
            anon_key = "sb_publishable_test"
            site_url = "https://extlink.example"

            [extension]
            address = "abcdefghijklmnop"
            bridge_command = "/usr/local/bin/extlink-bridge"
            delivery_timeout_ms = 2500

            [session]
            file = "/tmp/session.json"
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.supabase_url, "https://project.supabase.co");
        assert_eq!(config.supabase_anon_key, "sb_publishable_test");
        assert_eq!(config.site_url, "https://extlink.example");
        assert_eq!(config.extension_address, "abcdefghijklmnop");
        assert_eq!(
            config.bridge_command,
            PathBuf::from("/usr/local/bin/extlink-bridge")
        );
        assert_eq!(config.delivery_timeout_ms, 2500);
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn missing_sections_are_empty_facts() {
        let value: toml::Value = toml::from_str("").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap(), AppConfig::empty());
    }

    #[test]
    fn negative_timeout_is_clamped_to_zero() {
        let value: toml::Value = toml::from_str(
            r#"
            [extension]
            delivery_timeout_ms = -5
            "#,
        )
        .unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap().delivery_timeout_ms, 0);
    }
}
