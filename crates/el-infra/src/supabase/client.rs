use std::time::Duration;

use el_core::security::BearerToken;
use reqwest::{Method, RequestBuilder, Url};
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// OAuth provider offered on the registration page.
pub const SIGN_IN_PROVIDER: &str = "google";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub base_url: String,
    pub anon_key: String,
    /// Public origin that sign-in redirects resolve against.
    pub site_url: String,
    pub timeout_ms: u64,
}

impl SupabaseConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            site_url: String::new(),
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum SupabaseClientError {
    #[error("supabase base url missing")]
    BaseUrlMissing,
    #[error("supabase site url missing")]
    SiteUrlMissing,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http client build failed: {0}")]
    Build(String),
}

/// Thin wrapper over `reqwest::Client` carrying the project URL and API key.
#[derive(Debug, Clone)]
pub struct SupabaseRestClient {
    base_url: String,
    site_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseRestClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseClientError> {
        let base_url = normalize_base_url(&config.base_url);
        if base_url.is_empty() {
            return Err(SupabaseClientError::BaseUrlMissing);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(1)))
            .build()
            .map_err(|e| SupabaseClientError::Build(e.to_string()))?;
        Ok(Self {
            base_url,
            site_url: normalize_base_url(&config.site_url),
            anon_key: config.anon_key.trim().to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request carrying `apikey` plus the caller's token, or the anon key when signed out.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&BearerToken>,
    ) -> RequestBuilder {
        let authorization = match bearer {
            Some(token) => format!("Bearer {}", token.expose()),
            None => format!("Bearer {}", self.anon_key),
        };
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::AUTHORIZATION, authorization)
    }

    /// OAuth authorize URL that sends the user back to `redirect_path` on the site.
    pub fn authorize_url(&self, redirect_path: &str) -> Result<String, SupabaseClientError> {
        if self.site_url.is_empty() {
            return Err(SupabaseClientError::SiteUrlMissing);
        }
        let redirect_to = format!("{}/{}", self.site_url, redirect_path.trim_start_matches('/'));
        let mut url = Url::parse(&format!("{}/auth/v1/authorize", self.base_url))
            .map_err(|e| SupabaseClientError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("provider", SIGN_IN_PROVIDER)
            .append_pair("redirect_to", &redirect_to);
        Ok(url.to_string())
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
