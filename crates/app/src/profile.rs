//! Contact and delivery profile

use crate::backend::MarketplaceApi;
use crate::error::{AppError, AppResult};
use crate::listing::ViewState;
use crate::notify::{Notification, Notifier};
use crate::session::SessionStore;
use homecook_api_client::endpoints::{Profile, ProfilePayload};
use homecook_core::validation::{ValidationResult, Validator};
use std::sync::Arc;
use tracing::{info, warn};

/// Check a profile before it is sent
#[must_use]
pub fn validate_profile(profile: &Profile) -> ValidationResult {
    Validator::new()
        .min_length("firstName", &profile.first_name, 2, "First name must be at least 2 characters.")
        .min_length("lastName", &profile.last_name, 2, "Last name must be at least 2 characters.")
        .required("phoneNumber", &profile.phone_number, "Phone number is required.")
        .min_length("addressLine1", &profile.address_line1, 2, "Address must be at least 2 characters.")
        .min_length("city", &profile.city, 2, "City must be at least 2 characters.")
        .min_length("postCode", &profile.post_code, 2, "Post code must be at least 2 characters.")
        .min_length("country", &profile.country, 2, "Country must be at least 2 characters.")
        .validate()
}

/// Profile form backed by the session
pub struct ProfileView {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    session: Arc<SessionStore>,
}

impl ProfileView {
    /// Create the view
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        notifier: Arc<dyn Notifier>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            session,
        }
    }

    /// Existing profile to prefill the form with
    ///
    /// Users without a completed profile get an empty form and no request.
    pub async fn load(&self) -> ViewState<Profile> {
        let Some(session) = self.session.current() else {
            return ViewState::Ready(Profile::default());
        };
        if !session.is_profile_complete {
            return ViewState::Ready(Profile::default());
        }

        match self.api.profile(session.id).await {
            Ok(profile) => ViewState::Ready(profile),
            Err(e) => {
                warn!(error = %e, user = session.id, "Failed to load profile");
                self.notifier.notify(Notification::error(
                    "fetchProfile-error-toast",
                    Self::load_error_message(),
                ));
                ViewState::Failed
            }
        }
    }

    /// Message shown in place of the form when loading failed
    #[must_use]
    pub fn load_error_message() -> &'static str {
        "Error fetching profile, please try later."
    }

    /// Label of the submit button
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.session.current().is_some_and(|s| s.is_profile_complete) {
            "Update Profile Info"
        } else {
            "Save Profile Info"
        }
    }

    /// Validate and save, updating when a profile already exists
    pub async fn save(&self, profile: Profile) -> AppResult<()> {
        let session = self.session.require_session()?;

        let result = validate_profile(&profile);
        if !result.is_valid() {
            return Err(AppError::Validation(result));
        }

        let payload = ProfilePayload {
            profile,
            user_id: session.id,
        };
        let saved = if session.is_profile_complete {
            self.api.update_profile(&payload).await
        } else {
            self.api.create_profile(&payload).await
        };

        match saved {
            Ok(()) => {
                info!(user = session.id, "Profile saved");
                self.notifier.notify(Notification::success(
                    "profile-success-toast",
                    "Profile updated successfully.",
                ));
                self.session.mark_profile_complete()?;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to save profile");
                self.notifier.notify(Notification::error(
                    "profile-fail-toast",
                    "Failed to save profile information, please try again.",
                ));
                Err(e.into())
            }
        }
    }
}
