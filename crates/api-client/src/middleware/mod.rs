//! Response interception
//!
//! Every backend response passes through [`InterceptorSlot::inspect`]
//! before it is turned into a value or an [`ApiError`](crate::ApiError).
//! The session layer registers itself here so that a 401 anywhere in the
//! application expires the local session.
//!
//! The slot only keeps a weak reference. The session layer itself holds a
//! client, so a strong one would keep both alive forever.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use tracing::debug;

/// Observer of backend responses
pub trait ResponseInterceptor: Send + Sync {
    /// Called when the backend answered 401 Unauthorized
    fn on_unauthorized(&self);
}

/// Shared, replaceable interceptor registration
#[derive(Clone, Default)]
pub struct InterceptorSlot {
    inner: Arc<RwLock<Option<Weak<dyn ResponseInterceptor>>>>,
}

impl InterceptorSlot {
    /// Install `interceptor`, replacing any previous one
    ///
    /// The registration lapses once the last strong reference is dropped.
    pub fn set<I: ResponseInterceptor + 'static>(&self, interceptor: &Arc<I>) {
        let weak: Weak<dyn ResponseInterceptor> = Arc::<I>::downgrade(interceptor);
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(weak);
        }
    }

    /// Remove the installed interceptor
    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }

    /// Whether a live interceptor is installed
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<Arc<dyn ResponseInterceptor>> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.as_ref().and_then(Weak::upgrade))
    }

    /// Route a response status to the interceptor
    ///
    /// Returns `true` when the status was the unauthorized case.
    pub fn inspect(&self, status: u16) -> bool {
        if status != 401 {
            return false;
        }

        // Upgrade out of the lock so the callback may re-register.
        if let Some(interceptor) = self.current() {
            debug!("Forwarding 401 to response interceptor");
            interceptor.on_unauthorized();
        }
        true
    }
}

impl fmt::Debug for InterceptorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl ResponseInterceptor for Counter {
        fn on_unauthorized(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_only_401_reaches_interceptor() {
        let slot = InterceptorSlot::default();
        let counter = Arc::new(Counter::default());
        slot.set(&counter);

        assert!(!slot.inspect(200));
        assert!(!slot.inspect(403));
        assert!(!slot.inspect(500));
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        assert!(slot.inspect(401));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unset_slot_still_reports_401() {
        let slot = InterceptorSlot::default();
        assert!(!slot.is_set());
        assert!(slot.inspect(401));
    }

    #[test]
    fn test_clones_share_registration() {
        let slot = InterceptorSlot::default();
        let clone = slot.clone();
        let counter = Arc::new(Counter::default());

        clone.set(&counter);
        assert!(slot.is_set());
        slot.inspect(401);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        slot.clear();
        assert!(!clone.is_set());
    }

    #[test]
    fn test_dropped_interceptor_lapses() {
        let slot = InterceptorSlot::default();
        let counter = Arc::new(Counter::default());
        slot.set(&counter);
        assert!(slot.is_set());

        drop(counter);
        assert!(!slot.is_set());
        assert!(slot.inspect(401));
    }
}
