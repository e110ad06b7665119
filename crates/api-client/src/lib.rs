//! Typed API client for the HomeCook marketplace backend
//!
//! This crate provides the HTTP client used by the application layer to talk
//! to the marketplace API and to the image host that stores listing photos.
//!
//! # Features
//!
//! - **File and environment configuration**: shares `homecook.toml` with the rest of the app
//! - **Cookie sessions**: the backend session cookie lives in the client's jar
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//! - **Response interception**: a single hook hears about every 401
//!
//! # Example
//!
//! ```rust,no_run
//! use homecook_api_client::{HomeCookClient, endpoints::Credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HomeCookClient::new()?;
//!
//!     client.auth().login(&Credentials::new("cook@example.com", "secret")).await?;
//!     let user = client.auth().user_info().await?;
//!     println!("Logged in as {}", user.user_email);
//!
//!     let foods = client.foods().list().await?;
//!     println!("{} listings", foods.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod middleware;

pub use client::HomeCookClient;
pub use config::{ClientConfig, Environment, ImageHostConfig};
pub use error::{ApiError, ApiResult};
pub use middleware::ResponseInterceptor;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::HomeCookClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{
        AuthApi, CategoriesApi, Category, Credentials, Food, FoodsApi, ImageFile, ImagesApi,
        NewFood, PaymentsApi, Profile, ProfilePayload, ProfilesApi, UploadSignature,
        UploadedImage, UserInfo,
    };
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::middleware::ResponseInterceptor;
}
