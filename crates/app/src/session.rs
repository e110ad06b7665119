//! Authenticated identity
//!
//! [`SessionStore`] mirrors the backend's cookie session locally. The
//! session is persisted under the `user` key so a restarted client can
//! show the right view immediately, and it is revalidated against
//! `GET /user` on [`SessionStore::initialize`]. Any 401 seen by the
//! HTTP client reaches the store through [`ResponseInterceptor`] and
//! expires the local copy.

use crate::backend::MarketplaceApi;
use crate::error::{AppError, AppResult};
use crate::navigation::{Navigator, Redirect, Route};
use crate::notify::{Notification, Notifier};
use homecook_api_client::endpoints::{Credentials, UserInfo};
use homecook_api_client::ResponseInterceptor;
use homecook_core::storage::{KeyValueStore, KeyValueStoreExt};
use homecook_core::validation::Validator;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Storage key holding the persisted session
pub const SESSION_KEY: &str = "user";

/// Shown when no session was persisted
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login.";

/// Shown when the backend no longer accepts the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// The logged-in user as the client remembers it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// User id
    pub id: i64,
    /// Login email
    pub user_email: String,
    /// Chosen display name
    #[serde(default)]
    pub user_name: Option<String>,
    /// Whether a profile has been saved
    #[serde(default)]
    pub is_profile_complete: bool,
    /// Avatar URL
    #[serde(default)]
    pub user_image_url: Option<String>,
}

impl Session {
    /// Name to greet the user with
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.user_email)
    }
}

impl From<UserInfo> for Session {
    fn from(info: UserInfo) -> Self {
        Self {
            id: info.id,
            user_email: info.user_email,
            user_name: info.user_name,
            is_profile_complete: info.is_profile_complete,
            user_image_url: info.user_image_url,
        }
    }
}

/// Owner of the current session
pub struct SessionStore {
    api: Arc<dyn MarketplaceApi>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create a store, picking up any persisted session
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let persisted = match storage.get::<Session>(SESSION_KEY) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable persisted session");
                None
            }
        };

        Self {
            api,
            storage,
            navigator,
            notifier,
            current: RwLock::new(persisted),
        }
    }

    /// Revalidate the persisted session against the backend
    ///
    /// With nothing persisted this only redirects to the login view.
    pub async fn initialize(&self) -> Option<Session> {
        if self.current().is_none() {
            debug!("No persisted session");
            self.notifier
                .notify(Notification::info("login-required-toast", LOGIN_REQUIRED_MESSAGE));
            self.redirect_to_login(LOGIN_REQUIRED_MESSAGE);
            return None;
        }

        match self.api.user_info().await {
            Ok(info) => {
                let session = Session::from(info);
                if let Err(e) = self.set_session(Some(session.clone())) {
                    warn!(error = %e, "Failed to persist revalidated session");
                }
                debug!(user = session.id, "Session revalidated");
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "Session revalidation failed");
                self.expire();
                None
            }
        }
    }

    /// Log in and load the user record
    pub async fn login(&self, credentials: &Credentials) -> AppResult<Session> {
        validate_credentials(credentials)?;

        let result = async {
            self.api.login(credentials).await?;
            self.api.user_info().await
        }
        .await;

        match result {
            Ok(info) => {
                let session = Session::from(info);
                self.set_session(Some(session.clone()))?;
                info!(user = session.id, "Logged in");
                self.navigator.navigate(Redirect::to(Route::FoodList));
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.clear();
                self.notifier.notify(Notification::error(
                    "login-fail-toast",
                    "Failed to login, please try again",
                ));
                self.navigator.navigate(Redirect::to(Route::Login));
                Err(e.into())
            }
        }
    }

    /// Create an account, then send the user to the login view
    pub async fn register(&self, credentials: &Credentials) -> AppResult<()> {
        validate_credentials(credentials)?;

        match self.api.register(credentials).await {
            Ok(()) => {
                self.notifier.notify(Notification::success(
                    "register-success-toast",
                    "Account created. Please log in.",
                ));
                self.navigator.navigate(Redirect::to(Route::Login));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.notifier.notify(Notification::error(
                    "register-fail-toast",
                    "Failed to register, please try again",
                ));
                Err(e.into())
            }
        }
    }

    /// End the session on the backend, then locally
    ///
    /// A failed call leaves everything as it was.
    pub async fn logout(&self) -> AppResult<()> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout failed");
            self.notifier.notify(Notification::error(
                "logout-fail-toast",
                "Something went wrong, please try again to logout.",
            ));
            return Err(e.into());
        }

        self.clear();
        info!("Logged out");
        self.navigator.navigate(Redirect::replace(Route::Login));
        Ok(())
    }

    /// Replace the session, persisting it (or removing it for `None`)
    pub fn set_session(&self, session: Option<Session>) -> AppResult<()> {
        match &session {
            Some(s) => self.storage.set(SESSION_KEY, s)?,
            None => {
                self.storage.remove(SESSION_KEY)?;
            }
        }
        if let Ok(mut guard) = self.current.write() {
            *guard = session;
        }
        Ok(())
    }

    /// Current session, if any
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|g| g.clone())
    }

    /// Whether someone is logged in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Guard for protected views
    pub fn require_session(&self) -> AppResult<Session> {
        self.current().ok_or_else(|| {
            self.navigator.navigate(Redirect::replace(Route::Login));
            AppError::NotAuthenticated
        })
    }

    /// First view to show
    #[must_use]
    pub fn entry_route(&self) -> Route {
        if self.is_authenticated() {
            Route::FoodList
        } else {
            Route::Login
        }
    }

    /// Record that the user now has a profile
    pub fn mark_profile_complete(&self) -> AppResult<()> {
        let Some(mut session) = self.current() else {
            return Err(AppError::NotAuthenticated);
        };
        if !session.is_profile_complete {
            session.is_profile_complete = true;
            self.set_session(Some(session))?;
        }
        Ok(())
    }

    /// Drop the session from memory and storage, returning whether one existed
    fn clear(&self) -> bool {
        let in_memory = self
            .current
            .write()
            .map(|mut g| g.take().is_some())
            .unwrap_or(false);
        let persisted = match self.storage.remove(SESSION_KEY) {
            Ok(existed) => existed,
            Err(e) => {
                warn!(error = %e, "Failed to remove persisted session");
                false
            }
        };
        in_memory || persisted
    }

    /// Clear and redirect, once per session
    fn expire(&self) {
        if self.clear() {
            info!("Session expired");
            self.notifier
                .notify(Notification::error("session-expired-toast", SESSION_EXPIRED_MESSAGE));
            self.redirect_to_login(SESSION_EXPIRED_MESSAGE);
        }
    }

    fn redirect_to_login(&self, message: &str) {
        self.navigator
            .navigate(Redirect::to(Route::Login).with_message(message));
    }
}

impl ResponseInterceptor for SessionStore {
    fn on_unauthorized(&self) {
        self.expire();
    }
}

fn validate_credentials(credentials: &Credentials) -> AppResult<()> {
    let result = Validator::new()
        .required("email", &credentials.email, "Email is required")
        .required("password", &credentials.password, "Password is required")
        .validate();

    if result.is_valid() {
        Ok(())
    } else {
        Err(AppError::Validation(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, FakeApi, Harness};
    use homecook_api_client::{ApiError, ClientConfig, HomeCookClient};
    use homecook_core::storage::FileStore;

    fn store(h: &Harness) -> SessionStore {
        SessionStore::new(
            h.api.clone(),
            h.storage.clone(),
            h.history.clone(),
            h.notifications.clone(),
        )
    }

    fn persisted(h: &Harness) -> Option<Session> {
        h.storage.get(SESSION_KEY).unwrap()
    }

    fn credentials() -> Credentials {
        Credentials::new("cook@example.com", "hunter22")
    }

    #[tokio::test]
    async fn test_initialize_without_session_redirects_without_requests() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        let store = store(&h);

        assert!(store.initialize().await.is_none());

        assert!(h.api.calls().is_empty());
        let redirect = h.history.last().unwrap();
        assert_eq!(redirect.to, Route::Login);
        assert_eq!(redirect.message.as_deref(), Some(LOGIN_REQUIRED_MESSAGE));

        let prompt = h.notifications.get("login-required-toast").unwrap();
        assert!(!prompt.is_error());
        assert!(h.notifications.get("session-expired-toast").is_none());
    }

    #[tokio::test]
    async fn test_initialize_revalidates_and_replaces() {
        let h = Harness::new(FakeApi::new());
        let mut stale = Session::from(user(false));
        stale.user_name = Some("Old".into());
        h.storage.set(SESSION_KEY, &stale).unwrap();

        let mut fresh = user(true);
        fresh.user_name = Some("Ada".into());
        *h.api.user.lock().unwrap() = Some(fresh);

        let store = store(&h);
        let session = store.initialize().await.unwrap();

        assert_eq!(session.display_name(), "Ada");
        assert!(session.is_profile_complete);
        assert_eq!(persisted(&h), Some(session));
        assert!(h.history.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_failure_clears_and_redirects() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        h.storage.set(SESSION_KEY, &Session::from(user(true))).unwrap();
        h.api.fail("user_info");

        let store = store(&h);
        assert!(store.initialize().await.is_none());

        assert!(!store.is_authenticated());
        assert!(persisted(&h).is_none());
        let redirect = h.history.last().unwrap();
        assert_eq!(redirect.to, Route::Login);
        assert_eq!(redirect.message.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert_eq!(h.error_messages(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_login_success() {
        let h = Harness::new(FakeApi::new().with_user(user(false)));
        let store = store(&h);

        let session = store.login(&credentials()).await.unwrap();

        assert_eq!(session.display_name(), "cook@example.com");
        assert_eq!(h.api.calls(), vec!["login", "user_info"]);
        assert_eq!(persisted(&h), Some(session));
        assert_eq!(h.history.current(), Some(Route::FoodList));
    }

    #[tokio::test]
    async fn test_login_failure() {
        let h = Harness::new(FakeApi::new().with_user(user(false)));
        h.api.fail("login");
        let store = store(&h);

        assert!(store.login(&credentials()).await.is_err());

        assert!(!store.is_authenticated());
        assert_eq!(h.api.calls_to("user_info"), 0);
        assert_eq!(h.error_messages(), vec!["Failed to login, please try again"]);
        assert_eq!(h.history.current(), Some(Route::Login));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let h = Harness::new(FakeApi::new());
        let store = store(&h);

        let err = store
            .login(&Credentials::new("", ""))
            .await
            .unwrap_err();

        let fields = err.validation().unwrap();
        assert_eq!(fields.message_for("email"), Some("Email is required"));
        assert_eq!(fields.message_for("password"), Some("Password is required"));
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_register() {
        let h = Harness::new(FakeApi::new());
        let store = store(&h);

        store.register(&credentials()).await.unwrap();
        assert_eq!(h.history.current(), Some(Route::Login));

        h.api.fail("register");
        assert!(store.register(&credentials()).await.is_err());
        assert_eq!(h.error_messages(), vec!["Failed to register, please try again"]);
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_session() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        let store = store(&h);
        store.login(&credentials()).await.unwrap();
        let redirects = h.history.len();
        h.api.fail("logout");

        assert!(store.logout().await.is_err());

        assert!(store.is_authenticated());
        assert!(persisted(&h).is_some());
        assert_eq!(h.history.len(), redirects);
        let toast = h.notifications.get("logout-fail-toast").unwrap();
        assert_eq!(toast.message, "Something went wrong, please try again to logout.");
        assert!(toast.dismissible);
    }

    #[tokio::test]
    async fn test_logout_success() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        let store = store(&h);
        store.login(&credentials()).await.unwrap();

        store.logout().await.unwrap();

        assert!(!store.is_authenticated());
        assert!(persisted(&h).is_none());
        let redirect = h.history.last().unwrap();
        assert_eq!(redirect.to, Route::Login);
        assert!(redirect.replace);
    }

    #[tokio::test]
    async fn test_interceptor_expires_session_once() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        let store = store(&h);
        store.login(&credentials()).await.unwrap();
        let before = h.history.len();

        store.on_unauthorized();
        store.on_unauthorized();

        assert!(!store.is_authenticated());
        assert!(persisted(&h).is_none());
        assert_eq!(h.history.len(), before + 1);
        assert_eq!(
            h.history.last().unwrap().message.as_deref(),
            Some(SESSION_EXPIRED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_rejected_revalidation_expires() {
        let h = Harness::new(FakeApi::new().with_user(user(true)));
        h.storage.set(SESSION_KEY, &Session::from(user(true))).unwrap();
        h.api.reject("user_info");

        let store = store(&h);
        assert!(store.initialize().await.is_none());

        assert!(persisted(&h).is_none());
        assert_eq!(h.history.len(), 1);
        assert!(h.notifications.get("session-expired-toast").unwrap().is_error());
    }

    /// Answer every connection on a local port with `status` and no body
    async fn serve_status(status: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let response =
                    format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_backend_401_expires_session_through_client() {
        let base_url = serve_status("401 Unauthorized").await;
        let client = Arc::new(
            HomeCookClient::with_config(ClientConfig::default().with_base_url(base_url)).unwrap(),
        );
        let h = Harness::new(FakeApi::new());
        h.storage.set(SESSION_KEY, &Session::from(user(true))).unwrap();

        let store = Arc::new(SessionStore::new(
            client.clone(),
            h.storage.clone(),
            h.history.clone(),
            h.notifications.clone(),
        ));
        client.set_interceptor(&store);
        assert!(store.is_authenticated());

        let err = client.categories().list().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        assert!(!store.is_authenticated());
        assert!(persisted(&h).is_none());
        assert_eq!(
            h.history.last().unwrap().message.as_deref(),
            Some(SESSION_EXPIRED_MESSAGE)
        );

        // A second 401 finds nothing left to expire
        assert!(client.categories().list().await.is_err());
        assert_eq!(h.history.len(), 1);
    }

    #[test]
    fn test_corrupted_session_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let files = Arc::new(FileStore::new(dir.path()).unwrap());
        files.set(SESSION_KEY, &Session::from(user(true))).unwrap();
        std::fs::write(dir.path().join("user.json"), b"{\"id\":1}").unwrap();

        let h = Harness::new(FakeApi::new());
        let store = SessionStore::new(
            h.api.clone(),
            files,
            h.history.clone(),
            h.notifications.clone(),
        );

        assert!(!store.is_authenticated());
        assert!(!dir.path().join("user.json").exists());
    }

    #[test]
    fn test_require_session_and_entry_route() {
        let h = Harness::new(FakeApi::new());
        let store = store(&h);

        assert_eq!(store.entry_route(), Route::Login);
        assert!(matches!(store.require_session(), Err(AppError::NotAuthenticated)));
        assert!(h.history.last().unwrap().replace);

        store.set_session(Some(Session::from(user(false)))).unwrap();
        assert_eq!(store.entry_route(), Route::FoodList);
        assert!(store.require_session().is_ok());
    }

    #[test]
    fn test_mark_profile_complete_persists() {
        let h = Harness::new(FakeApi::new());
        let store = store(&h);
        assert!(store.mark_profile_complete().is_err());

        store.set_session(Some(Session::from(user(false)))).unwrap();
        store.mark_profile_complete().unwrap();

        assert!(store.current().unwrap().is_profile_complete);
        assert!(persisted(&h).unwrap().is_profile_complete);
    }

    #[test]
    fn test_unreadable_persisted_session_is_ignored() {
        let h = Harness::new(FakeApi::new());
        h.storage.write(SESSION_KEY, b"not json").unwrap();
        assert!(!store(&h).is_authenticated());
    }
}
