//! CLI command implementations

pub mod add_food;
pub mod auth;
pub mod checkout;
pub mod foods;
pub mod profile;
