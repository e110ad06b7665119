//! Shared state for one CLI invocation

use crate::output::TerminalNotifier;
use crate::OutputFormat;
use anyhow::{anyhow, Context, Result};
use homecook_api_client::{ClientConfig, Environment, HomeCookClient};
use homecook_app::catalog::CategoryStore;
use homecook_app::navigation::History;
use homecook_app::session::{Session, SessionStore};
use homecook_core::config::Config;
use homecook_core::storage::{FileStore, KeyValueStore, KeyValueStoreExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the backend cookie header
const COOKIE_KEY: &str = "cookies";

/// Everything a command needs, wired together
pub struct AppContext {
    pub config: Config,
    pub client: Arc<HomeCookClient>,
    pub storage: Arc<FileStore>,
    pub notifier: Arc<TerminalNotifier>,
    pub history: Arc<History>,
    pub session: Arc<SessionStore>,
    pub categories: Arc<CategoryStore>,
}

impl AppContext {
    /// Load configuration, restore cookies and the session
    pub fn load(config_path: Option<&str>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config_path)?;
        let environment = Environment::from_env();
        let client_config = ClientConfig::from_schema(&config.schema, environment);
        let client = Arc::new(HomeCookClient::with_config(client_config)?);

        let dir = config.schema.storage.resolved_dir();
        let storage = Arc::new(
            FileStore::new(&dir)
                .with_context(|| format!("Failed to open state directory {}", dir.display()))?,
        );
        match storage.get::<String>(COOKIE_KEY) {
            Ok(Some(cookies)) => client.restore_cookies(&cookies)?,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable backend cookies"),
        }

        let notifier = Arc::new(TerminalNotifier::new(format));
        let history = Arc::new(History::new());
        let session = Arc::new(SessionStore::new(
            client.clone(),
            storage.clone(),
            history.clone(),
            notifier.clone(),
        ));
        client.set_interceptor(&session);

        let categories = Arc::new(CategoryStore::new(client.clone(), notifier.clone()));

        debug!(
            base_url = client.base_url(),
            state_dir = %dir.display(),
            config = ?config.path,
            "Context ready"
        );

        Ok(Self {
            config,
            client,
            storage,
            notifier,
            history,
            session,
            categories,
        })
    }

    /// Revalidated session, or an error telling the user to log in
    pub async fn require_session(&self) -> Result<Session> {
        self.session
            .initialize()
            .await
            .ok_or_else(|| anyhow!("Not logged in. Run `homecook login` first."))
    }

    /// Save the backend cookies for the next invocation
    pub fn persist_cookies(&self) -> Result<()> {
        match self.client.session_cookies() {
            Some(cookies) => self.storage.set(COOKIE_KEY, &cookies)?,
            None => {
                self.storage.remove(COOKIE_KEY)?;
            }
        }
        Ok(())
    }
}
