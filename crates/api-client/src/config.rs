//! Configuration for the HomeCook API client
//!
//! Built from the shared [`ConfigSchema`] so that `homecook.toml` and the
//! `HOMECOOK_*` variables drive both the backend and the image host.

use crate::error::{ApiError, ApiResult};
use homecook_core::config::{Config, ConfigSchema};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default upload endpoint root of the image host
pub const DEFAULT_IMAGE_HOST_URL: &str = "https://api.cloudinary.com/v1_1";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development backend with a self-signed certificate
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Parse from the `HOMECOOK_ENV` environment variable
    pub fn from_env() -> Self {
        Self::parse(&env::var("HOMECOOK_ENV").unwrap_or_default())
    }

    /// Parse an environment name, defaulting to development
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        }
    }
}

/// Image host upload settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageHostConfig {
    /// Root of the upload API (without the cloud name)
    pub upload_url: String,
    /// Cloud name the listing images live under
    pub cloud_name: String,
    /// Public API key sent alongside the signature
    pub api_key: String,
    /// Upload preset applied by the host
    pub upload_preset: String,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_IMAGE_HOST_URL.to_string(),
            cloud_name: String::new(),
            api_key: String::new(),
            upload_preset: "homeCook".to_string(),
        }
    }
}

impl ImageHostConfig {
    /// Full upload URL for images under the configured cloud
    #[must_use]
    pub fn image_upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.upload_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the marketplace API
    pub base_url: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Accept self-signed certificates
    pub accept_invalid_certs: bool,
    /// Image host settings
    pub image_host: ImageHostConfig,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_schema(&ConfigSchema::default(), Environment::default())
    }
}

impl ClientConfig {
    /// Create configuration from `homecook.toml` and the environment
    ///
    /// Reads the standard config file locations plus:
    /// - `HOMECOOK_ENV`: Environment (development/staging/production)
    /// - `HOMECOOK_API_URL`: Base URL of the marketplace API
    /// - `HOMECOOK_TIMEOUT_SECS`: Request timeout in seconds
    /// - `HOMECOOK_CLOUDINARY_CLOUD_NAME` / `HOMECOOK_CLOUDINARY_API_KEY`
    pub fn from_env() -> ApiResult<Self> {
        let config = Config::load(None).map_err(|e| ApiError::config(e.to_string()))?;
        Ok(Self::from_schema(&config.schema, Environment::from_env()))
    }

    /// Build from an already loaded schema
    #[must_use]
    pub fn from_schema(schema: &ConfigSchema, environment: Environment) -> Self {
        Self {
            base_url: schema.api.base_url.clone(),
            timeout: Duration::from_secs(schema.api.timeout_secs),
            accept_invalid_certs: schema.api.accept_invalid_certs
                || environment == Environment::Development,
            image_host: ImageHostConfig {
                upload_url: DEFAULT_IMAGE_HOST_URL.to_string(),
                cloud_name: schema.images.cloud_name.clone(),
                api_key: schema.images.api_key.clone(),
                upload_preset: schema.images.upload_preset.clone(),
            },
            environment,
        }
    }

    /// Create development configuration (local backend)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: "https://localhost:7145/api".to_string(),
            timeout: Duration::from_secs(10),
            accept_invalid_certs: true,
            image_host: ImageHostConfig::default(),
            environment: Environment::Development,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the image host
    #[must_use]
    pub fn with_image_host(mut self, image_host: ImageHostConfig) -> Self {
        self.image_host = image_host;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.environment == Environment::Production && self.accept_invalid_certs {
            return Err(ApiError::config(
                "accept_invalid_certs is not allowed in production",
            ));
        }

        Ok(())
    }
}
