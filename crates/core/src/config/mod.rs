//! Configuration loading and schema definitions
//!
//! The client reads `homecook.toml` and lets `HOMECOOK_*` environment
//! variables override individual values.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
