//! Profile endpoints
//!
//! A profile holds the buyer/seller's contact and delivery details. The
//! backend tracks whether one exists through `isProfileComplete` on the
//! user record, which decides between create and update.

use crate::client::HomeCookClient;
use crate::error::ApiResult;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Contact and delivery details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Contact phone number
    #[serde(default)]
    pub phone_number: String,
    /// First address line
    #[serde(default)]
    pub address_line1: String,
    /// Town or city
    #[serde(default)]
    pub city: String,
    /// Postal code
    #[serde(default)]
    pub post_code: String,
    /// Country
    #[serde(default)]
    pub country: String,
}

/// A profile together with its owner, as sent on create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    /// Profile fields
    #[serde(flatten)]
    pub profile: Profile,
    /// Owner's user id
    pub user_id: i64,
}

/// Profiles API interface
#[derive(Clone)]
pub struct ProfilesApi {
    client: HomeCookClient,
}

impl ProfilesApi {
    /// Create a new profiles API interface
    pub(crate) fn new(client: HomeCookClient) -> Self {
        Self { client }
    }

    /// Fetch a user's profile
    ///
    /// GET /profile/{userId}
    pub async fn get(&self, user_id: i64) -> ApiResult<Profile> {
        self.client.get(&format!("profile/{user_id}")).await
    }

    /// Create the profile of a user who has none yet
    ///
    /// POST /profile
    pub async fn create(&self, payload: &ProfilePayload) -> ApiResult<()> {
        let _: IgnoredAny = self.client.post("profile", payload).await?;
        Ok(())
    }

    /// Replace an existing profile
    ///
    /// PUT /profile/update-profile
    pub async fn update(&self, payload: &ProfilePayload) -> ApiResult<()> {
        let _: IgnoredAny = self.client.put("profile/update-profile", payload).await?;
        Ok(())
    }
}
