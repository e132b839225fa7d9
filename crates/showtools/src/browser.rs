use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SiteError;

/// Side effects the site asks of the browser.
///
/// Implementations are cheap handles (`Clone`) so scheduled tasks can carry
/// their own copy.
pub trait Browser {
    /// Leave the page for `href`. One-way: nothing after this is expected to run.
    fn navigate(&self, href: &str) -> Result<(), SiteError>;

    /// Rewrite the visible URL without reloading or adding a history entry.
    fn replace_url(&self, href: &str) -> Result<(), SiteError>;

    /// Activate a throwaway `<a href=.. download>` so the browser saves `href`
    /// under its default filename. The browser reports no failure for this.
    fn activate_download(&self, href: &str) -> Result<(), SiteError>;

    /// Lock or unlock page scrolling while a modal is open.
    fn set_scroll_locked(&self, locked: bool);
}

/// One recorded call on a [`MemoryBrowser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Navigate(String),
    ReplaceUrl(String),
    Download(String),
    ScrollLock(bool),
}

/// In-memory browser that records effects instead of performing them.
/// Clones share the same log. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBrowser {
    effects: Rc<RefCell<Vec<Effect>>>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, oldest first.
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.effects
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Effect::Download(href) => Some(href.clone()),
                _ => None,
            })
            .collect()
    }

    /// Most recent navigation target, if any.
    pub fn last_navigation(&self) -> Option<String> {
        self.effects.borrow().iter().rev().find_map(|e| match e {
            Effect::Navigate(href) => Some(href.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.effects.borrow_mut().clear();
    }

    fn record(&self, effect: Effect) {
        self.effects.borrow_mut().push(effect);
    }
}

impl Browser for MemoryBrowser {
    fn navigate(&self, href: &str) -> Result<(), SiteError> {
        self.record(Effect::Navigate(href.to_string()));
        Ok(())
    }

    fn replace_url(&self, href: &str) -> Result<(), SiteError> {
        self.record(Effect::ReplaceUrl(href.to_string()));
        Ok(())
    }

    fn activate_download(&self, href: &str) -> Result<(), SiteError> {
        self.record(Effect::Download(href.to_string()));
        Ok(())
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.record(Effect::ScrollLock(locked));
    }
}
