//! Session-scoped flags.
//!
//! Flags live for the browser tab's session only. They are written once and
//! never deleted; the session ending clears them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::SiteError;

/// Set when a visitor leaves for the payment page; holds the download URL.
pub const PENDING_DOWNLOAD_KEY: &str = "pendingDownload";

/// Set once the first-visit loader has played.
pub const LOADER_KEY: &str = "showtools_loaded";

/// Trait for session storage backends.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError>;
}

/// In-memory session store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// True the first time it is called in a session, false afterwards.
///
/// A store that refuses the write still reports a first visit; the loader
/// then plays again on the next load, which is harmless.
pub fn first_visit<S: SessionStore + ?Sized>(store: &S) -> bool {
    if store.get(LOADER_KEY).is_some() {
        return false;
    }
    if let Err(e) = store.set(LOADER_KEY, "true") {
        tracing::warn!(error = %e, "failed to record loader flag");
    }
    true
}

/// Download URL stashed before the payment redirect, if any.
pub fn pending_download<S: SessionStore + ?Sized>(store: &S) -> Option<String> {
    store.get(PENDING_DOWNLOAD_KEY)
}
