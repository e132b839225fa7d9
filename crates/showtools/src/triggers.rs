//! Declarative table of static page triggers.
//!
//! The front end walks [`TRIGGERS`] once at startup and registers one
//! listener per matching element. Selectors that match nothing are skipped.

/// What a trigger does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open the download gate.
    OpenGate,
    /// Close the download gate if it is open.
    CloseGate,
    /// Smooth-scroll to the element an in-page anchor points at.
    ScrollToAnchor,
    /// The page is going away: drop anything still scheduled.
    Teardown,
}

/// Where the listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every element matching a CSS selector.
    Selector(&'static str),
    /// The document itself.
    Document,
    /// The window.
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub target: Target,
    /// DOM event name.
    pub event: &'static str,
    /// For keyboard events, the `KeyboardEvent.key` that fires the trigger.
    pub key: Option<&'static str>,
    pub action: Action,
}

impl Trigger {
    /// Whether the browser's default handling should be suppressed.
    pub fn prevents_default(&self) -> bool {
        matches!(self.action, Action::OpenGate | Action::ScrollToAnchor)
    }

    /// Whether an event with `key` (None for non-keyboard events) fires this
    /// trigger.
    pub fn accepts_key(&self, key: Option<&str>) -> bool {
        match self.key {
            Some(expected) => key == Some(expected),
            None => true,
        }
    }
}

pub const TRIGGERS: &[Trigger] = &[
    Trigger {
        target: Target::Selector(".donation-trigger"),
        event: "click",
        key: None,
        action: Action::OpenGate,
    },
    Trigger {
        target: Target::Document,
        event: "keydown",
        key: Some("Escape"),
        action: Action::CloseGate,
    },
    Trigger {
        target: Target::Selector("a[href^=\"#\"]:not(.donation-trigger)"),
        event: "click",
        key: None,
        action: Action::ScrollToAnchor,
    },
    Trigger {
        target: Target::Window,
        event: "pagehide",
        key: None,
        action: Action::Teardown,
    },
];
