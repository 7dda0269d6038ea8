use hocon::HoconLoader;
use serde::{Deserialize, Serialize};
use std::path::Path;

use authcode_core::CodeRedemption;

pub const DEFAULT_CONFIG_PATH: &str = "application.conf";
pub const ENV_PREFIX: &str = "AUTHCODE";

const MASKED: &str = "***MASKED***";

/// Layered beneath every HOCON file so partial files resolve to complete configs.
const HOCON_DEFAULTS: &str = r#"
server {
  host = "0.0.0.0"
  port = 8080
}
grant {
  reusable_codes = false
}
bootstrap {
  client_id = "my_client_id"
  client_secret = "my_client_secret"
  redirect_uris = []
}
"#;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub grant: GrantConfig,
    #[serde(default)]
    pub bootstrap: BootstrapClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GrantConfig {
    /// Keep authorization codes redeemable after a successful exchange.
    ///
    /// Off by default; turning it on is not RFC 6749 compliant.
    pub reusable_codes: bool,
}

impl GrantConfig {
    pub fn code_redemption(&self) -> CodeRedemption {
        if self.reusable_codes {
            CodeRedemption::Reusable
        } else {
            CodeRedemption::SingleUse
        }
    }
}

/// The single client registered before the listener starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Empty means any redirect_uri is accepted for this client.
    pub redirect_uris: Vec<String>,
}

impl Default for BootstrapClientConfig {
    fn default() -> Self {
        Self {
            client_id: "my_client_id".to_string(),
            client_secret: "my_client_secret".to_string(),
            redirect_uris: Vec::new(),
        }
    }
}

impl Config {
    /// Load `application.conf` if present, else `AUTHCODE_*` environment variables,
    /// else built-in defaults.
    pub fn load() -> Self {
        Self::from_hocon().unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                "Failed to load HOCON config. Falling back to environment variables."
            );
            Self::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid environment configuration. Using defaults.");
                Self::default()
            })
        })
    }

    /// Load configuration from HOCON file with environment variable substitution
    pub fn from_hocon() -> Result<Self, String> {
        Self::from_hocon_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific HOCON file path
    pub fn from_hocon_path<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(format!("Configuration file not found: {}", path.display()));
        }

        HoconLoader::new()
            .load_str(HOCON_DEFAULTS)
            .map_err(|e| format!("Failed to load HOCON defaults: {}", e))?
            .load_file(path)
            .map_err(|e| format!("Failed to load HOCON file: {}", e))?
            .resolve()
            .map_err(|e| format!("Failed to parse and resolve HOCON: {}", e))
    }

    /// Environment-only configuration, e.g. `AUTHCODE_SERVER__PORT=9090`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.bootstrap.client_id.trim().is_empty() {
            return Err("bootstrap.client_id must not be empty".to_string());
        }
        if self.bootstrap.client_secret.is_empty() {
            return Err("bootstrap.client_secret must not be empty".to_string());
        }
        Ok(())
    }

    /// Produce a version safe to log (secrets masked).
    pub fn sanitized(&self) -> Self {
        let mut clone = self.clone();
        clone.bootstrap.client_secret = MASKED.to_string();
        clone
    }
}
