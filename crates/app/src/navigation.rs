//! Navigation between views

use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// A view the client can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Login form, also the unauthenticated entry point
    Login,
    /// Food grid
    FoodList,
    /// One listing
    FoodDetail(i64),
    /// Checkout for the current order intent
    Checkout,
    /// Contact and delivery details
    Profile,
    /// Listing creation form
    AddFood,
    /// Where the payment processor returns after confirmation
    PaymentSuccess,
}

impl Route {
    /// URL path of the route
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::FoodList => "/food-list".to_string(),
            Self::FoodDetail(id) => format!("/food/{id}"),
            Self::Checkout => "/checkoutContainer".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::AddFood => "/add-food".to_string(),
            Self::PaymentSuccess => "/payment-success".to_string(),
        }
    }

    /// Whether the route needs a session
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Destination
    pub to: Route,
    /// Replace the current history entry instead of pushing
    pub replace: bool,
    /// Message the destination shows on arrival
    pub message: Option<String>,
}

impl Redirect {
    /// Push `to` onto the history
    #[must_use]
    pub fn to(to: Route) -> Self {
        Self {
            to,
            replace: false,
            message: None,
        }
    }

    /// Replace the current entry with `to`
    #[must_use]
    pub fn replace(to: Route) -> Self {
        Self {
            to,
            replace: true,
            message: None,
        }
    }

    /// Attach an arrival message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Something that can change the current view
pub trait Navigator: Send + Sync {
    /// Go to `redirect.to`
    fn navigate(&self, redirect: Redirect);
}

/// In-memory navigation history
#[derive(Debug, Default)]
pub struct History {
    entries: RwLock<Vec<Redirect>>,
}

impl History {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every redirect received, in order
    #[must_use]
    pub fn entries(&self) -> Vec<Redirect> {
        self.entries.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Most recent redirect
    #[must_use]
    pub fn last(&self) -> Option<Redirect> {
        self.entries.read().ok().and_then(|g| g.last().cloned())
    }

    /// Route currently shown
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.last().map(|r| r.to)
    }

    /// Number of redirects received
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether nothing has navigated yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Navigator for History {
    fn navigate(&self, redirect: Redirect) {
        debug!(to = %redirect.to, replace = redirect.replace, "Navigate");
        if let Ok(mut guard) = self.entries.write() {
            guard.push(redirect);
        }
    }
}
