//! Core utilities for the HomeCook marketplace client
//!
//! This crate provides the pieces shared by the API client, the application
//! state layer and the command-line front end:
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Validation**: a fluent validator producing field-level errors
//! - **Configuration**: TOML-based configuration with environment overrides
//! - **Storage**: the persisted key/value store that backs the session
//!
//! # Example
//!
//! ```rust,no_run
//! use homecook_core::{config::Config, storage::{FileStore, KeyValueStoreExt}};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let store = FileStore::new(config.schema.storage.resolved_dir()).expect("storage");
//! let user: Option<serde_json::Value> = store.get("user").expect("read");
//! println!("persisted session present: {}", user.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod storage;
pub mod validation;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::storage::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore};
    pub use crate::validation::{ValidationError, ValidationResult, Validator};
}
