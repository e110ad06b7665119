//! Authentication endpoints
//!
//! The backend keeps the session in an HTTP-only cookie. Login and
//! registration only set or create it; the user record has to be fetched
//! separately from `GET /user`.

use crate::client::HomeCookClient;
use crate::error::ApiResult;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Email and password pair used for login and registration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The authenticated user as reported by `GET /user`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User id
    pub id: i64,
    /// Login email
    pub user_email: String,
    /// Display name, when the user has set one
    #[serde(default)]
    pub user_name: Option<String>,
    /// Whether a delivery profile exists
    #[serde(default)]
    pub is_profile_complete: bool,
    /// Avatar URL
    #[serde(default)]
    pub user_image_url: Option<String>,
}

/// Authentication API interface
#[derive(Clone)]
pub struct AuthApi {
    client: HomeCookClient,
}

impl AuthApi {
    /// Create a new auth API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// Log in, storing the session cookie in the client's jar
    ///
    /// POST /login
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<()> {
        let _: IgnoredAny = self.client.post("login", credentials).await?;
        info!(email = %credentials.email, "Logged in");
        Ok(())
    }

    /// Create an account
    ///
    /// POST /register
    pub async fn register(&self, credentials: &Credentials) -> ApiResult<()> {
        let _: IgnoredAny = self.client.post("register", credentials).await?;
        info!(email = %credentials.email, "Registered");
        Ok(())
    }

    /// Fetch the user the session cookie belongs to
    ///
    /// GET /user
    pub async fn user_info(&self) -> ApiResult<UserInfo> {
        self.client.get("user").await
    }

    /// End the backend session
    ///
    /// POST /logout
    pub async fn logout(&self) -> ApiResult<()> {
        let _: IgnoredAny = self.client.post("logout", &serde_json::json!({})).await?;
        Ok(())
    }
}
