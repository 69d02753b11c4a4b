//! Provider settings and the profile file
//!
//! [`ProviderConfig`] is the provider block: credential, endpoint and the
//! tunables for request timeouts, operation polling and the database
//! read-after-create retry. Every field is optional; unset fields fall back to
//! the environment and then to built-in defaults when the provider is
//! configured.
//!
//! [`Config`] is the TOML profile file the CLI reads. Each profile holds a
//! `ProviderConfig`.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sevalla_api::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, PollConfig, RetryPolicy};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::credential::{self, BASE_URL_ENV, TOKEN_ENV};
use super::error::{ConfigError, Result};

/// Shortest accepted gap between operation status checks
const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Provider block
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API token; falls back to `SEVALLA_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// API endpoint; falls back to `SEVALLA_BASE_URL`, then the public API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Seconds between operation status checks, at least one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
    /// Seconds before an operation wait gives up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_timeout_secs: Option<u64>,
    /// Reads attempted after creating a database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_read_attempts: Option<u32>,
    /// Pause between those reads, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_read_delay_ms: Option<u64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("token", &self.token.as_deref().map(credential::mask))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("database_read_attempts", &self.database_read_attempts)
            .field("database_read_delay_ms", &self.database_read_delay_ms)
            .finish()
    }
}

impl ProviderConfig {
    /// Layer `overrides` on top of `self`; fields set in `overrides` win
    pub fn merge(self, overrides: ProviderConfig) -> ProviderConfig {
        ProviderConfig {
            token: overrides.token.or(self.token),
            base_url: overrides.base_url.or(self.base_url),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            poll_interval_secs: overrides.poll_interval_secs.or(self.poll_interval_secs),
            poll_timeout_secs: overrides.poll_timeout_secs.or(self.poll_timeout_secs),
            database_read_attempts: overrides
                .database_read_attempts
                .or(self.database_read_attempts),
            database_read_delay_ms: overrides
                .database_read_delay_ms
                .or(self.database_read_delay_ms),
        }
    }

    /// Token from configuration or `SEVALLA_TOKEN`
    pub fn resolve_token(&self) -> Result<String> {
        credential::resolve(self.token.as_deref(), TOKEN_ENV).ok_or(ConfigError::MissingToken)
    }

    /// Endpoint from configuration, `SEVALLA_BASE_URL`, or the default
    pub fn resolve_base_url(&self) -> Result<String> {
        let base_url = credential::resolve(self.base_url.as_deref(), BASE_URL_ENV)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        match url::Url::parse(&base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(base_url),
            Ok(parsed) => Err(ConfigError::InvalidBaseUrl {
                url: base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }),
            Err(e) => Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: e.to_string(),
            }),
        }
    }

    /// Transport settings with credential and endpoint resolved
    pub fn client_config(&self) -> Result<ClientConfig> {
        let token = self.resolve_token()?;
        let base_url = self.resolve_base_url()?;
        let timeout = self
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(ClientConfig::new(token)
            .with_base_url(base_url)
            .with_timeout(timeout))
    }

    /// Operation wait cadence and deadline
    pub fn poll_config(&self) -> PollConfig {
        let defaults = PollConfig::default();
        PollConfig {
            interval: self
                .poll_interval_secs
                .map(|secs| Duration::from_secs(secs.max(MIN_POLL_INTERVAL_SECS)))
                .unwrap_or(defaults.interval),
            timeout: self
                .poll_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Database read-after-create retry settings
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            attempts: self.database_read_attempts.unwrap_or(defaults.attempts),
            delay: self
                .database_read_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        }
    }
}

/// Profile file
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> provider block
    #[serde(default)]
    pub profiles: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Pick the provider block for a run.
    ///
    /// An explicit name must exist. Without one, the default profile is used,
    /// then the only profile if there is exactly one. Otherwise an empty block
    /// is returned and everything resolves from the environment.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<ProviderConfig> {
        if let Some(name) = explicit_profile {
            return self
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
        }

        if let Some(name) = &self.default_profile {
            return self
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::ProfileNotFound { name: name.clone() });
        }

        if self.profiles.len() == 1 {
            return Ok(self.profiles.values().next().cloned().unwrap_or_default());
        }

        Ok(ProviderConfig::default())
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: ProviderConfig) {
        self.profiles.insert(name, profile);
    }

    /// Get the path to the configuration file
    ///
    /// On Linux: ~/.config/sevalla/config.toml
    /// On macOS: ~/Library/Application Support/com.sevalla.sevalla/config.toml
    /// On Windows: %APPDATA%\sevalla\sevalla\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "sevalla", "sevalla").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references.
    ///
    /// Unset variables without a default are left as written so profiles that
    /// are not in use do not need their variables defined.
    ///
    /// ```toml
    /// [profiles.prod]
    /// token = "${SEVALLA_PROD_TOKEN}"
    /// base_url = "${SEVALLA_PROD_URL:-https://api.sevalla.com/v2}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn profile(token: &str) -> ProviderConfig {
        ProviderConfig {
            token: Some(token.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.set_profile(
            "prod".to_string(),
            ProviderConfig {
                token: Some("tok".to_string()),
                poll_interval_secs: Some(2),
                ..Default::default()
            },
        );
        config.default_profile = Some("prod".to_string());

        let serialized = toml::to_string(&config).unwrap();
        assert!(!serialized.contains("base_url"));

        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.default_profile.as_deref(), Some("prod"));
        assert_eq!(deserialized.profiles["prod"], config.profiles["prod"]);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = ProviderConfig {
            token: Some("file-token".to_string()),
            base_url: Some("https://file.example".to_string()),
            poll_interval_secs: Some(9),
            ..Default::default()
        };
        let overrides = ProviderConfig {
            token: Some("flag-token".to_string()),
            ..Default::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.token.as_deref(), Some("flag-token"));
        assert_eq!(merged.base_url.as_deref(), Some("https://file.example"));
        assert_eq!(merged.poll_interval_secs, Some(9));
    }

    #[test]
    fn test_debug_masks_token() {
        let rendered = format!("{:?}", profile("sk_live_abcdef123456"));
        assert!(!rendered.contains("sk_live_abcdef123456"));
        assert!(rendered.contains("****3456"));
    }

    #[test]
    #[serial]
    fn test_missing_token() {
        unsafe {
            std::env::remove_var(TOKEN_ENV);
        }
        let err = ProviderConfig::default().client_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
        assert!(err.to_string().contains("SEVALLA_TOKEN"));
    }

    #[test]
    #[serial]
    fn test_token_from_env() {
        unsafe {
            std::env::set_var(TOKEN_ENV, "env-token");
            std::env::remove_var(BASE_URL_ENV);
        }
        let config = ProviderConfig::default();
        assert_eq!(config.resolve_token().unwrap(), "env-token");
        assert_eq!(config.resolve_base_url().unwrap(), DEFAULT_BASE_URL);
        unsafe {
            std::env::remove_var(TOKEN_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_base_url_precedence() {
        unsafe {
            std::env::set_var(BASE_URL_ENV, "https://env.example/v2");
        }
        let explicit = ProviderConfig {
            base_url: Some("https://explicit.example/v2".to_string()),
            ..Default::default()
        };
        assert_eq!(
            explicit.resolve_base_url().unwrap(),
            "https://explicit.example/v2"
        );
        assert_eq!(
            ProviderConfig::default().resolve_base_url().unwrap(),
            "https://env.example/v2"
        );
        unsafe {
            std::env::remove_var(BASE_URL_ENV);
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ProviderConfig {
            base_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.resolve_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let config = ProviderConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.resolve_base_url().is_err());
    }

    #[test]
    fn test_tunables_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.poll_config(), PollConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());

        let tuned = ProviderConfig {
            poll_interval_secs: Some(1),
            poll_timeout_secs: Some(30),
            database_read_attempts: Some(5),
            database_read_delay_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(tuned.poll_config().interval, Duration::from_secs(1));
        assert_eq!(tuned.poll_config().timeout, Duration::from_secs(30));
        assert_eq!(tuned.retry_policy().attempts, 5);
        assert_eq!(tuned.retry_policy().delay, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_poll_interval_is_floored() {
        let config = ProviderConfig {
            poll_interval_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.poll_config().interval, Duration::from_secs(1));
    }

    #[test]
    fn test_profile_resolution() {
        let mut config = Config::default();
        assert_eq!(config.resolve_profile(None).unwrap(), ProviderConfig::default());

        config.set_profile("only".to_string(), profile("a"));
        assert_eq!(config.resolve_profile(None).unwrap(), profile("a"));

        config.set_profile("other".to_string(), profile("b"));
        assert_eq!(config.resolve_profile(None).unwrap(), ProviderConfig::default());
        assert_eq!(config.resolve_profile(Some("other")).unwrap(), profile("b"));

        config.default_profile = Some("only".to_string());
        assert_eq!(config.resolve_profile(None).unwrap(), profile("a"));

        assert!(matches!(
            config.resolve_profile(Some("missing")),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("SEVALLA_TEST_TOKEN", "expanded-token");
            std::env::remove_var("SEVALLA_TEST_MISSING");
        }

        let content = r#"
[profiles.test]
token = "${SEVALLA_TEST_TOKEN}"
base_url = "${SEVALLA_TEST_MISSING:-https://api.sevalla.com/v2}"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("expanded-token"));
        assert!(expanded.contains("https://api.sevalla.com/v2"));

        unsafe {
            std::env::remove_var("SEVALLA_TEST_TOKEN");
        }
    }
}
