//! Layered application configuration.

use config::{Config, File, FileFormat};
use saga_error::{ConfigError, SagaResult};
use saga_models::OpenAiConfig;
use saga_narrative::NarrativeConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../saga.toml");

/// Model gateway settings, the `[gateway]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GatewaySettings {
    /// Endpoint root of the OpenAI-compatible API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer credential, usually supplied through `OPENAI_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Completion length cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl GatewaySettings {
    /// Client settings for [`saga_models::OpenAiClient`].
    pub fn to_openai_config(&self) -> Result<OpenAiConfig, ConfigError> {
        OpenAiConfig::builder()
            .base_url(self.base_url.clone())
            .model(self.model.clone())
            .api_key(self.api_key.clone())
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| ConfigError::for_key("gateway", e.to_string()))
    }
}

/// HTTP listener settings, the `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl ServerSettings {
    /// The address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| ConfigError::for_key("server.host", format!("{}: {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Complete Saga configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SagaConfig {
    /// Model gateway
    pub gateway: GatewaySettings,
    /// Story shape and theme handling
    #[serde(default)]
    pub narrative: NarrativeConfig,
    /// HTTP listener
    pub server: ServerSettings,
}

/// A configuration file layered over the bundled defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
    required: bool,
}

impl ConfigFile {
    /// A file that is skipped when absent.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }

    /// A file that must exist.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }
}

/// Environment values that override every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// `OPENAI_MODEL`
    pub model: Option<String>,
    /// `OPENAI_BASE_URL`
    pub base_url: Option<String>,
    /// `MAX_TOKENS`
    pub max_tokens: Option<String>,
    /// `TEMPERATURE`
    pub temperature: Option<String>,
    /// `PORT`
    pub port: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    ///
    /// Empty variables count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: var("OPENAI_API_KEY"),
            model: var("OPENAI_MODEL"),
            base_url: var("OPENAI_BASE_URL"),
            max_tokens: var("MAX_TOKENS"),
            temperature: var("TEMPERATURE"),
            port: var("PORT"),
        }
    }

    fn pairs(&self) -> [(&'static str, Option<&String>); 6] {
        [
            ("gateway.api_key", self.api_key.as_ref()),
            ("gateway.model", self.model.as_ref()),
            ("gateway.base_url", self.base_url.as_ref()),
            ("gateway.max_tokens", self.max_tokens.as_ref()),
            ("gateway.temperature", self.temperature.as_ref()),
            ("server.port", self.port.as_ref()),
        ]
    }
}

impl SagaConfig {
    /// Load configuration with precedence: environment > file > bundled default.
    ///
    /// Sources in order (later sources override earlier):
    /// 1. Bundled defaults (`saga.toml` shipped with the binary)
    /// 2. `~/.config/saga/saga.toml`, if present
    /// 3. `explicit` if given (must exist), otherwise `./saga.toml` if present
    /// 4. `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`, `MAX_TOKENS`,
    ///    `TEMPERATURE`, `PORT`
    ///
    /// # Errors
    ///
    /// A `ConfigError` if a file cannot be read, a value has the wrong type,
    /// or validation fails.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> SagaResult<Self> {
        let mut files = Vec::new();
        if let Some(home) = dirs::home_dir() {
            files.push(ConfigFile::optional(home.join(".config/saga/saga.toml")));
        }
        files.push(match explicit {
            Some(path) => ConfigFile::required(path),
            None => ConfigFile::optional("saga.toml"),
        });

        Self::load_from(&files, &EnvOverrides::from_env())
    }

    /// Load from the bundled defaults, then `files` in order, then `env`.
    pub fn load_from(files: &[ConfigFile], env: &EnvOverrides) -> SagaResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        for file in files {
            debug!(path = %file.path.display(), required = file.required, "Adding config file");
            builder = builder.add_source(
                File::from(file.path.as_path())
                    .format(FileFormat::Toml)
                    .required(file.required),
            );
        }

        for (key, value) in env.pairs() {
            builder = builder
                .set_override_option(key, value.cloned())
                .map_err(|e| ConfigError::for_key(key, e.to_string()))?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        debug!(model = %config.gateway.model, port = config.server.port, "Configuration loaded");
        Ok(config)
    }

    /// Parse a complete configuration from TOML text, without layering.
    pub fn from_toml(text: &str) -> SagaResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gateway = &self.gateway;
        if !(0.0..=2.0).contains(&gateway.temperature) {
            return Err(ConfigError::for_key(
                "gateway.temperature",
                format!("{} is outside 0.0..=2.0", gateway.temperature),
            ));
        }
        if gateway.max_tokens == 0 {
            return Err(ConfigError::for_key("gateway.max_tokens", "must be positive"));
        }
        if gateway.timeout_secs == 0 {
            return Err(ConfigError::for_key("gateway.timeout_secs", "must be positive"));
        }
        if gateway.model.trim().is_empty() {
            return Err(ConfigError::for_key("gateway.model", "must not be empty"));
        }
        if gateway.base_url.trim().is_empty() {
            return Err(ConfigError::for_key("gateway.base_url", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saga_narrative::ThemePolicy;

    #[test]
    fn test_bundled_defaults() {
        let config = SagaConfig::load_from(&[], &EnvOverrides::default()).unwrap();
        assert_eq!(config.gateway.model, "gpt-3.5-turbo");
        assert_eq!(config.gateway.max_tokens, 500);
        assert_eq!(config.gateway.temperature, 0.8);
        assert_eq!(config.gateway.timeout_secs, 60);
        assert!(config.gateway.api_key.is_none());
        assert_eq!(config.narrative, NarrativeConfig::default());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_bundled_defaults_parse_standalone() {
        let config = SagaConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides_parse_numbers() {
        let env = EnvOverrides {
            max_tokens: Some("120".to_string()),
            temperature: Some("1.5".to_string()),
            port: Some("8080".to_string()),
            ..Default::default()
        };
        let config = SagaConfig::load_from(&[], &env).unwrap();
        assert_eq!(config.gateway.max_tokens, 120);
        assert_eq!(config.gateway.temperature, 1.5);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_temperature_out_of_range() {
        let env = EnvOverrides {
            temperature: Some("2.5".to_string()),
            ..Default::default()
        };
        let err = SagaConfig::load_from(&[], &env).unwrap_err();
        assert!(err.to_string().contains("gateway.temperature"));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut config = SagaConfig::from_toml(DEFAULT_CONFIG).unwrap();
        config.gateway.max_tokens = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.key.as_deref(), Some("gateway.max_tokens"));
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        let env = EnvOverrides {
            port: Some("eighty".to_string()),
            ..Default::default()
        };
        assert!(SagaConfig::load_from(&[], &env).is_err());
    }

    #[test]
    fn test_theme_policy_from_toml() {
        let text = DEFAULT_CONFIG.replace("theme_policy = \"reject\"", "theme_policy = \"generate\"");
        let config = SagaConfig::from_toml(&text).unwrap();
        assert_eq!(*config.narrative.theme_policy(), ThemePolicy::Generate);
    }

    #[test]
    fn test_gateway_settings_to_client_config() {
        let mut config = SagaConfig::from_toml(DEFAULT_CONFIG).unwrap();
        config.gateway.api_key = Some("sk-test".to_string());
        config.gateway.timeout_secs = 5;

        let client = config.gateway.to_openai_config().unwrap();
        assert_eq!(client.api_key().as_deref(), Some("sk-test"));
        assert_eq!(*client.timeout(), Duration::from_secs(5));
        assert_eq!(*client.max_tokens(), 500);
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 4000,
        };
        assert_eq!(settings.socket_addr().unwrap().to_string(), "0.0.0.0:4000");

        let bad = ServerSettings {
            host: "localhost:99".to_string(),
            port: 4000,
        };
        assert!(bad.socket_addr().is_err());
    }
}
