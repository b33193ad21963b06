//! Configuration management for the copilot agent service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use copilot_github::ClientConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::state::WebhookConfig;

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The service works out-of-the-box with production-ready defaults.
/// Create `config.toml` to customize configuration for your environment.
/// Use environment variables for deployment-specific overrides.
///
/// # Example
///
/// ```no_run
/// use copilot_api::Config;
///
/// // Load configuration from all sources
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Server will bind to {}:{}", config.host, config.port);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Webhook authentication
    /// Shared secret for webhook signature verification.
    ///
    /// Absent or empty means signatures are not configured; requests must
    /// then arrive without a signature header.
    ///
    /// Environment variable: `WEBHOOK_SECRET`
    #[serde(default, alias = "WEBHOOK_SECRET")]
    pub webhook_secret: Option<String>,

    // Identity resolution
    /// Product name presented to GitHub in the User-Agent header.
    ///
    /// Environment variable: `PRODUCT_NAME`
    #[serde(default = "default_product_name", alias = "PRODUCT_NAME")]
    pub product_name: String,
    /// Base URL of the GitHub API used to resolve caller identity.
    ///
    /// Environment variable: `GITHUB_API_URL`
    #[serde(default = "default_github_api_url", alias = "GITHUB_API_URL")]
    pub github_api_url: String,
    /// Timeout for GitHub API requests in seconds.
    ///
    /// Environment variable: `GITHUB_TIMEOUT`
    #[serde(default = "default_github_timeout", alias = "GITHUB_TIMEOUT")]
    pub github_timeout: u64,
}

impl Config {
    /// Load configuration from defaults, config file, and environment variable
    /// overrides.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (e.g., `WEBHOOK_SECRET`, `PORT`)
    /// 2. Configuration file (`config.toml`)
    /// 3. Built-in defaults (production-ready values)
    ///
    /// The system works out-of-the-box with sensible defaults. Create
    /// `config.toml` to customize configuration, or use environment
    /// variables for deployment-specific overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let mut config: Self = figment.extract().context("Failed to load configuration")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Convert to the identity client's configuration.
    ///
    /// The User-Agent is `{product_name}/{version}` so GitHub can attribute
    /// traffic to this agent.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.github_api_url.clone(),
            timeout: Duration::from_secs(self.github_timeout),
            user_agent: format!("{}/{}", self.product_name, env!("CARGO_PKG_VERSION")),
            max_redirects: 3,
        }
    }

    /// Convert to the webhook authentication settings shared with handlers.
    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig { secret: self.webhook_secret.clone() }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Folds degenerate values into canonical form.
    ///
    /// An empty `webhook_secret` means verification is unconfigured and
    /// becomes `None`, giving downstream code a single disabled
    /// representation.
    fn normalize(&mut self) {
        if self.webhook_secret.as_deref() == Some("") {
            self.webhook_secret = None;
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            anyhow::bail!("host must not be empty");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.product_name.is_empty() {
            anyhow::bail!("product_name must not be empty");
        }

        if !self.github_api_url.starts_with("http://") && !self.github_api_url.starts_with("https://")
        {
            anyhow::bail!("github_api_url must be an http(s) URL");
        }

        if self.github_timeout == 0 {
            anyhow::bail!("github_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            webhook_secret: None,
            product_name: default_product_name(),
            github_api_url: default_github_api_url(),
            github_timeout: default_github_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_product_name() -> String {
    "MSDevPlatform".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        vars: Vec<String>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Self { _lock: lock, vars: Vec::new(), originals: HashMap::new() }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            if !self.vars.contains(&key.to_string()) {
                self.originals.insert(key.to_string(), env::var(key).ok());
                self.vars.push(key.to_string());
            }
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                match self.originals.get(var) {
                    Some(Some(value)) => env::set_var(var, value),
                    Some(None) => env::remove_var(var),
                    None => {},
                }
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.webhook_secret, None);
        assert_eq!(config.product_name, "MSDevPlatform");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.github_timeout, 10);
    }

    #[test]
    fn env_variables_override_defaults() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("HOST", "0.0.0.0");
        guard.set_var("PORT", "9090");
        guard.set_var("REQUEST_TIMEOUT", "45");
        guard.set_var("WEBHOOK_SECRET", "s3cr3t");
        guard.set_var("PRODUCT_NAME", "ExampleBot");
        guard.set_var("GITHUB_API_URL", "https://github.example.com/api/v3");
        guard.set_var("GITHUB_TIMEOUT", "5");

        let config = Config::load().expect("Config should load with env overrides");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.request_timeout, 45);
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.product_name, "ExampleBot");
        assert_eq!(config.github_api_url, "https://github.example.com/api/v3");
        assert_eq!(config.github_timeout, 5);
    }

    #[test]
    fn empty_webhook_secret_normalizes_to_none() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("WEBHOOK_SECRET", "");

        let config = Config::load().expect("Config should load with empty secret");

        assert_eq!(config.webhook_secret, None);
    }

    #[test]
    fn invalid_config_validation_fails() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.host = String::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.request_timeout = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.product_name = String::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.github_api_url = "ftp://api.github.com".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.github_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn socket_address_parsing() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 9000;

        let addr = config.parse_server_addr().expect("Should parse socket address");

        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn client_config_carries_product_user_agent() {
        let config = Config::default();
        let client = config.client_config();

        assert_eq!(client.api_base, "https://api.github.com");
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.user_agent, format!("MSDevPlatform/{}", env!("CARGO_PKG_VERSION")));
        assert_eq!(client.max_redirects, 3);
    }

    #[test]
    fn webhook_config_carries_secret() {
        let mut config = Config::default();
        config.webhook_secret = Some("shared".to_string());

        assert_eq!(config.webhook_config().secret.as_deref(), Some("shared"));
        assert_eq!(Config::default().webhook_config().secret, None);
    }
}
