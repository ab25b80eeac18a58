//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on el-infra, el-platform and el-app at once.
//! It assembles adapters and resolves empty config values to built-in
//! defaults; it makes no activation decisions.
//!
//! 仅用于"组装"，不用于"决策"。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use el_app::app_paths::AppPaths;
use el_app::usecases::{
    ActivationOrchestrator, ActivationSettings, DeliverTokenToExtension,
    DEFAULT_DELIVERY_TIMEOUT_MS, SIGN_IN_REDIRECT_PATH,
};
use el_core::config::AppConfig;
use el_core::ids::{ExtensionAddress, InvalidExtensionAddress};
use el_core::ports::{ActivationEventPort, ExtensionRuntimePort, IdentityPort};
use el_infra::supabase::{SupabaseConfig, SupabaseProfileStore, SupabaseRestClient};
use el_infra::{FileSessionIdentity, SystemClock};
use el_platform::NativeMessagingBridge;

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("supabase url is not configured (set [supabase] url or EXTLINK_SUPABASE_URL)")]
    SupabaseUrlMissing,

    #[error("supabase client initialization failed: {0}")]
    SupabaseInit(String),

    #[error("configured extension address is invalid: {0}")]
    ExtensionAddress(#[from] InvalidExtensionAddress),
}

/// Everything a front end needs for one activation view.
pub struct ActivationRuntime {
    pub orchestrator: Arc<ActivationOrchestrator>,
    pub identity: Arc<dyn IdentityPort>,
    pub extension_runtime: Arc<dyn ExtensionRuntimePort>,
    pub settings: ActivationSettings,
}

/// Resolve settings from config; empty values fall back to built-in defaults.
pub fn activation_settings(config: &AppConfig) -> WiringResult<ActivationSettings> {
    let extension_address = if config.extension_address.trim().is_empty() {
        ExtensionAddress::default()
    } else {
        ExtensionAddress::parse(&config.extension_address)?
    };
    let timeout_ms = match config.delivery_timeout_ms {
        0 => DEFAULT_DELIVERY_TIMEOUT_MS,
        ms => ms,
    };
    Ok(ActivationSettings {
        extension_address,
        delivery_timeout: Duration::from_millis(timeout_ms),
        sign_in_redirect: SIGN_IN_REDIRECT_PATH.to_string(),
    })
}

fn session_file(config: &AppConfig, paths: &AppPaths) -> PathBuf {
    if config.session_file.as_os_str().is_empty() {
        paths.session_path.clone()
    } else {
        config.session_file.clone()
    }
}

pub fn wire_activation(
    config: &AppConfig,
    paths: &AppPaths,
    event_port: Arc<dyn ActivationEventPort>,
) -> WiringResult<ActivationRuntime> {
    if config.supabase_url.trim().is_empty() {
        return Err(WiringError::SupabaseUrlMissing);
    }
    let settings = activation_settings(config)?;

    let rest = SupabaseRestClient::new(
        SupabaseConfig::new(&config.supabase_url, &config.supabase_anon_key)
            .with_site_url(&config.site_url),
    )
    .map_err(|e| WiringError::SupabaseInit(e.to_string()))?;

    let identity: Arc<dyn IdentityPort> = Arc::new(FileSessionIdentity::new(
        session_file(config, paths),
        Some(rest.clone()),
    ));
    let profile_store = Arc::new(SupabaseProfileStore::new(rest, identity.clone()));
    let extension_runtime: Arc<dyn ExtensionRuntimePort> = Arc::new(NativeMessagingBridge::new(
        Some(config.bridge_command.clone()),
    ));
    let deliver_token = Arc::new(DeliverTokenToExtension::new(
        extension_runtime.clone(),
        settings.delivery_timeout,
    ));

    let orchestrator = Arc::new(ActivationOrchestrator::new(
        settings.clone(),
        identity.clone(),
        profile_store,
        deliver_token,
        event_port,
        Arc::new(SystemClock),
    ));

    Ok(ActivationRuntime {
        orchestrator,
        identity,
        extension_runtime,
        settings,
    })
}
