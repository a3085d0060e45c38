//! Application configuration for SearchRelay.
//!
//! User config lives at `~/.searchrelay/searchrelay.toml`.
//! Values missing from the file fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchRelayError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "searchrelay.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".searchrelay";

// ---------------------------------------------------------------------------
// Config structs (matching searchrelay.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search backend settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Which backend performs searches: "serper" or "searxng".
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Name of the env var holding the Serper API key (never store the key
    /// itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Serper search endpoint.
    #[serde(default = "default_serper_endpoint")]
    pub serper_endpoint: String,

    /// Base URL of a self-hosted SearxNG instance. Required when
    /// `backend = "searxng"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searxng_endpoint: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many hits to request from the backend per search.
    #[serde(default = "default_requested_results")]
    pub requested_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_key_env: default_api_key_env(),
            serper_endpoint: default_serper_endpoint(),
            searxng_endpoint: None,
            timeout_secs: default_timeout_secs(),
            requested_results: default_requested_results(),
        }
    }
}

fn default_backend() -> String {
    "serper".into()
}
fn default_api_key_env() -> String {
    "SERPER_API_KEY".into()
}
fn default_serper_endpoint() -> String {
    "https://google.serper.dev/search".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_requested_results() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Provider config (runtime view handed to the provider registry)
// ---------------------------------------------------------------------------

/// Runtime provider configuration derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Backend name: "serper" or "searxng".
    pub backend: String,
    /// Env var holding the API key for hosted backends.
    pub api_key_env: String,
    /// Serper search endpoint.
    pub serper_endpoint: String,
    /// SearxNG base URL, if configured.
    pub searxng_endpoint: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Hits to request per search.
    pub requested_results: usize,
}

impl From<&AppConfig> for ProviderConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            backend: config.search.backend.clone(),
            api_key_env: config.search.api_key_env.clone(),
            serper_endpoint: config.search.serper_endpoint.clone(),
            searxng_endpoint: config.search.searxng_endpoint.clone(),
            timeout_secs: config.search.timeout_secs,
            requested_results: config.search.requested_results,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.searchrelay/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SearchRelayError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.searchrelay/searchrelay.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does
/// not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SearchRelayError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SearchRelayError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SearchRelayError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SearchRelayError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SearchRelayError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check config consistency: known backend, parseable endpoints, sane limits.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.search.backend.as_str() {
        "serper" => {
            url::Url::parse(&config.search.serper_endpoint)
                .map_err(|e| SearchRelayError::config(format!("invalid serper_endpoint: {e}")))?;
        }
        "searxng" => {
            let endpoint = config.search.searxng_endpoint.as_deref().ok_or_else(|| {
                SearchRelayError::config("searxng backend requires searxng_endpoint")
            })?;
            url::Url::parse(endpoint)
                .map_err(|e| SearchRelayError::config(format!("invalid searxng_endpoint: {e}")))?;
        }
        other => {
            return Err(SearchRelayError::config(format!(
                "unknown search backend \"{other}\" (expected \"serper\" or \"searxng\")"
            )));
        }
    }

    if config.search.timeout_secs == 0 {
        return Err(SearchRelayError::config("timeout_secs must be at least 1"));
    }

    if config.search.requested_results == 0 {
        return Err(SearchRelayError::config(
            "requested_results must be at least 1",
        ));
    }

    Ok(())
}

/// Check that the API key env var for the configured backend is set and
/// non-empty. Self-hosted backends need no key.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    if config.search.backend != "serper" {
        return Ok(());
    }

    let var_name = &config.search.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(SearchRelayError::config(format!(
            "Serper API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://serper.dev/api-key"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("backend"));
        assert!(toml_str.contains("SERPER_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.backend, "serper");
        assert_eq!(parsed.search.timeout_secs, 10);
        assert_eq!(parsed.search.requested_results, 10);
    }

    #[test]
    fn config_with_searxng_backend() {
        let toml_str = r#"
[search]
backend = "searxng"
searxng_endpoint = "http://searxng.local:8888"
timeout_secs = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.search.backend, "searxng");
        assert_eq!(
            config.search.searxng_endpoint.as_deref(),
            Some("http://searxng.local:8888")
        );
        assert_eq!(config.search.timeout_secs, 5);
        // Untouched fields keep their defaults.
        assert_eq!(config.search.requested_results, 10);

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn provider_config_from_app_config() {
        let app = AppConfig::default();
        let provider = ProviderConfig::from(&app);
        assert_eq!(provider.backend, "serper");
        assert_eq!(provider.serper_endpoint, "https://google.serper.dev/search");
        assert_eq!(provider.timeout_secs, 10);
    }

    #[test]
    fn validate_rejects_unknown_backend() {
        let mut config = AppConfig::default();
        config.search.backend = "bong".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("unknown search backend"));
    }

    #[test]
    fn validate_requires_searxng_endpoint() {
        let mut config = AppConfig::default();
        config.search.backend = "searxng".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("searxng_endpoint"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = AppConfig::default();
        config.search.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.search.api_key_env = "SR_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn api_key_not_required_for_searxng() {
        let mut config = AppConfig::default();
        config.search.backend = "searxng".into();
        config.search.api_key_env = "SR_TEST_NONEXISTENT_KEY_67890".into();
        assert!(validate_api_key(&config).is_ok());
    }
}
