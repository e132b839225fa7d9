//! Client-side behavior for the Show Tools site.
//!
//! The crate holds every rule the site applies and none of the DOM plumbing.
//! Browser access goes through three seams so the same code runs natively in
//! tests and inside the WASM front end:
//!
//! - [`Browser`] — navigation, URL rewriting, download activation, scroll lock
//! - [`SessionStore`] — session-scoped string flags
//! - [`Scheduler`] — cancellable delayed tasks
//!
//! # Download gate
//!
//! ```
//! use showtools::{DownloadGate, MemoryBrowser, MemorySessionStore, SiteConfig};
//!
//! let browser = MemoryBrowser::new();
//! let mut gate = DownloadGate::new(SiteConfig::default(), browser.clone(), MemorySessionStore::new());
//!
//! gate.open_gate();
//! gate.select_custom("3.00");
//! assert_eq!(gate.confirm_label(), "Buy Me A Beer — $3.00");
//!
//! let url = gate.confirm_donation().unwrap().unwrap();
//! assert!(url.as_str().ends_with("?prefilled_amount=300"));
//! ```

pub mod amount;
pub mod browser;
pub mod constants;
pub mod error;
pub mod gate;
pub mod nav;
pub mod review;
pub mod schedule;
pub mod session;
pub mod triggers;

// Re-exports
pub use amount::DonationAmount;
pub use browser::{Browser, Effect, MemoryBrowser};
pub use constants::*;
pub use error::SiteError;
pub use gate::{DownloadGate, GateState, Selection};
pub use nav::{anchor_target, is_active_link, Typewriter};
pub use review::{Review, ReviewError, ReviewForm};
pub use schedule::{ManualScheduler, Notifying, Scheduler, TaskHandle};
pub use session::{first_visit, MemorySessionStore, SessionStore};
pub use triggers::{Action, Target, Trigger, TRIGGERS};
