//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Backend API
    #[serde(default)]
    pub api: ApiSection,

    /// Image host
    #[serde(default)]
    pub images: ImagesSection,

    /// Payment processor
    #[serde(default)]
    pub payments: PaymentsSection,

    /// Persisted client state
    #[serde(default)]
    pub storage: StorageSection,
}

impl ConfigSchema {
    /// Apply `HOMECOOK_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HOMECOOK_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = lookup("HOMECOOK_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.api.timeout_secs = secs;
        }
        if let Some(name) = lookup("HOMECOOK_CLOUDINARY_CLOUD_NAME") {
            self.images.cloud_name = name;
        }
        if let Some(key) = lookup("HOMECOOK_CLOUDINARY_API_KEY") {
            self.images.api_key = key;
        }
        if let Some(key) = lookup("HOMECOOK_STRIPE_PUBLIC_KEY") {
            self.payments.publishable_key = key;
        }
        if let Some(dir) = lookup("HOMECOOK_STORAGE_DIR") {
            self.storage.dir = Some(PathBuf::from(dir));
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    /// Base URL of the marketplace API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept self-signed certificates (local development backend)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

fn default_base_url() -> String {
    "https://localhost:7145/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Image host settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImagesSection {
    /// Cloud name on the image host
    #[serde(default)]
    pub cloud_name: String,

    /// Public API key sent with signed uploads
    #[serde(default)]
    pub api_key: String,

    /// Upload preset applied by the host
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,

    /// Maximum number of files accepted per drop
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for ImagesSection {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            upload_preset: default_upload_preset(),
            max_files: default_max_files(),
        }
    }
}

fn default_upload_preset() -> String {
    "homeCook".to_string()
}

fn default_max_files() -> usize {
    10
}

/// Payment processor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentsSection {
    /// Publishable key for the payment element
    #[serde(default)]
    pub publishable_key: String,

    /// ISO 4217 currency, lowercase as the processor expects it
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Where the processor sends the buyer after confirmation
    #[serde(default = "default_success_url")]
    pub success_url: String,
}

impl Default for PaymentsSection {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            currency: default_currency(),
            success_url: default_success_url(),
        }
    }
}

fn default_currency() -> String {
    "gbp".to_string()
}

fn default_success_url() -> String {
    "http://localhost:5173/payment-success".to_string()
}

/// Persisted client state settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageSection {
    /// Directory holding persisted state (defaults to the user data dir)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StorageSection {
    /// Directory actually used for persisted state
    #[must_use]
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".homecook"))
                .join("homecook")
        })
    }
}
