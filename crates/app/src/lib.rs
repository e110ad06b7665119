//! Client-side state for the HomeCook marketplace
//!
//! This crate holds everything a HomeCook front end needs between the
//! HTTP client and the screen:
//!
//! - **Session**: login, logout, revalidation and expiry on 401
//! - **Catalog**: the category cache and the food grid/detail views
//! - **Checkout**: quantity bounds, totals and payment-intent requests
//! - **Profile** and **listing creation** forms with field validation
//! - **Images**: format screening and concurrent signed uploads
//! - **Notifications** and **navigation** seams the front end implements
//!
//! Collaborators are passed in as trait objects ([`MarketplaceApi`],
//! [`ImageHost`], [`Notifier`], [`Navigator`]), so every flow runs the
//! same way against the real client or an in-memory double.
//!
//! # Example
//!
//! ```rust,no_run
//! use homecook_app::prelude::*;
//! use homecook_core::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(HomeCookClient::new()?);
//!     let notifications = Arc::new(NotificationCenter::new());
//!     let history = Arc::new(History::new());
//!
//!     let session = Arc::new(SessionStore::new(
//!         client.clone(),
//!         Arc::new(MemoryStore::new()),
//!         history.clone(),
//!         notifications.clone(),
//!     ));
//!     client.set_interceptor(&session);
//!
//!     session.login(&Credentials::new("cook@example.com", "secret")).await?;
//!     println!("Now at {:?}", history.current());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod add_food;
pub mod backend;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod format;
pub mod images;
pub mod listing;
pub mod navigation;
pub mod notify;
pub mod profile;
pub mod session;

#[cfg(test)]
mod testing;

pub use backend::{ImageHost, MarketplaceApi};
pub use error::{AppError, AppResult};
pub use navigation::{Navigator, Redirect, Route};
pub use notify::{Notification, NotificationCenter, Notifier};
pub use session::{Session, SessionStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::add_food::{AddFoodView, NewFoodForm};
    pub use crate::backend::{ImageHost, MarketplaceApi};
    pub use crate::catalog::CategoryStore;
    pub use crate::checkout::{CheckoutSession, OrderIntent, QuantityField};
    pub use crate::error::{AppError, AppResult};
    pub use crate::format::{format_date, format_price};
    pub use crate::images::{ImageUploader, PendingFile, UploadOutcome};
    pub use crate::listing::{FoodDetail, FoodDetailView, FoodFilter, FoodGrid, ViewState};
    pub use crate::navigation::{History, Navigator, Redirect, Route};
    pub use crate::notify::{Notification, NotificationCenter, Notifier};
    pub use crate::profile::ProfileView;
    pub use crate::session::{Session, SessionStore};
    pub use homecook_api_client::endpoints::Credentials;
    pub use homecook_api_client::HomeCookClient;
}
