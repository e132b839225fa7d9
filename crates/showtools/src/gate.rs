//! Download gate: an optional donation step in front of a file download.
//!
//! One [`DownloadGate`] lives per page load. Visitors either skip straight to
//! the download or leave for the hosted payment page; the payment page sends
//! them back with `?thanks=true`, and the next load's
//! [`handle_return`](DownloadGate::handle_return) finishes the job.
//!
//! ```text
//! Idle -> GateOpen -> AwaitingExternalPayment   (control leaves the page)
//!                  -> Downloading               (skipped)
//! next load: Returned -> Downloading
//! ```

use std::cell::Cell;
use std::rc::Rc;

use url::{form_urlencoded, Url};

use crate::amount::DonationAmount;
use crate::browser::Browser;
use crate::constants::{SiteConfig, CONFIRM_LABEL, RETURN_PARAM, RETURN_VALUE};
use crate::error::SiteError;
use crate::schedule::{Scheduler, TaskHandle};
use crate::session::{pending_download, SessionStore, PENDING_DOWNLOAD_KEY};

/// Where the gate is within the current page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Idle,
    GateOpen,
    /// Navigation to the payment page has been issued.
    AwaitingExternalPayment,
    /// Came back with the return marker; download scheduled.
    Returned,
    Downloading,
}

/// Which amount affordance is highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// A quick-amount button, by its amount in cents.
    Preset(u64),
    /// The custom amount field has focus.
    Custom,
}

struct PendingDownload {
    _handle: TaskHandle,
    fired: Rc<Cell<bool>>,
}

pub struct DownloadGate<B, S> {
    config: SiteConfig,
    browser: B,
    session: S,
    state: GateState,
    amount: DonationAmount,
    selection: Selection,
    custom_input: String,
    banner_visible: bool,
    pending: Option<PendingDownload>,
}

impl<B, S> DownloadGate<B, S>
where
    B: Browser + Clone + 'static,
    S: SessionStore,
{
    pub fn new(config: SiteConfig, browser: B, session: S) -> Self {
        Self {
            config,
            browser,
            session,
            state: GateState::Idle,
            amount: DonationAmount::ZERO,
            selection: Selection::None,
            custom_input: String::new(),
            banner_visible: false,
            pending: None,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Current state. The move from `Returned` to `Downloading` happens
    /// inside the scheduled task, outside any `&mut self` call, so a caller
    /// that caches or observes the gate should schedule through
    /// [`Notifying`](crate::schedule::Notifying) to hear about it.
    pub fn state(&self) -> GateState {
        match &self.pending {
            Some(p) if self.state == GateState::Returned && p.fired.get() => GateState::Downloading,
            _ => self.state,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::GateOpen
    }

    pub fn amount(&self) -> DonationAmount {
        self.amount
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn custom_input(&self) -> &str {
        &self.custom_input
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    pub fn confirm_enabled(&self) -> bool {
        self.amount.cents() >= self.config.min_donation_cents
    }

    /// Confirm button text: `Buy Me A Beer — $3.00` once an amount is
    /// selected, plain `Buy Me A Beer` otherwise.
    pub fn confirm_label(&self) -> String {
        if self.confirm_enabled() {
            format!("{} — {}", CONFIRM_LABEL, self.amount)
        } else {
            CONFIRM_LABEL.to_string()
        }
    }

    // --- Gate ---

    /// Show the choice UI with a clean slate.
    pub fn open_gate(&mut self) {
        self.state = GateState::GateOpen;
        self.amount = DonationAmount::ZERO;
        self.selection = Selection::None;
        self.custom_input.clear();
        self.browser.set_scroll_locked(true);
        tracing::debug!("download gate opened");
    }

    pub fn close_gate(&mut self) {
        if self.state == GateState::GateOpen {
            self.state = GateState::Idle;
        }
        self.browser.set_scroll_locked(false);
    }

    /// Pick a quick amount in cents. Clears the custom field.
    pub fn select_preset(&mut self, cents: u64) {
        self.custom_input.clear();
        self.selection = Selection::Preset(cents);
        self.amount = DonationAmount::from_cents(cents, self.config.min_donation_cents);
    }

    /// Pick a quick amount from its `data-amount` attribute.
    pub fn select_preset_attr(&mut self, attr: &str) {
        let amount = DonationAmount::parse_preset(attr, self.config.min_donation_cents);
        self.select_preset(amount.cents());
    }

    /// The custom field took focus: it becomes the highlighted affordance.
    pub fn focus_custom(&mut self) {
        self.selection = Selection::Custom;
    }

    /// The custom field changed. `input` is in dollars.
    pub fn select_custom(&mut self, input: &str) {
        self.selection = Selection::Custom;
        self.custom_input = input.to_string();
        self.amount = DonationAmount::parse_dollars(input, self.config.min_donation_cents);
    }

    /// Leave for the payment page with the selected amount prefilled.
    ///
    /// Returns `Ok(None)` without side effects when no valid amount is
    /// selected.
    pub fn confirm_donation(&mut self) -> Result<Option<Url>, SiteError> {
        if !self.confirm_enabled() {
            return Ok(None);
        }

        let url = self.config.payment_url(self.amount)?;

        // The return trip works off the URL marker; losing this flag only
        // loses the stashed download URL.
        if let Err(e) = self
            .session
            .set(PENDING_DOWNLOAD_KEY, &self.config.download_url)
        {
            tracing::warn!(error = %e, "failed to record pending download");
        }

        tracing::info!(amount_cents = self.amount.cents(), "redirecting to payment page");
        self.browser.navigate(url.as_str())?;
        self.state = GateState::AwaitingExternalPayment;
        Ok(Some(url))
    }

    /// Close the gate and download right away.
    pub fn skip_donation(&mut self) -> Result<(), SiteError> {
        self.close_gate();
        self.state = GateState::Downloading;
        self.trigger_download()
    }

    pub fn trigger_download(&self) -> Result<(), SiteError> {
        tracing::info!(url = %self.config.download_url, "starting download");
        self.browser.activate_download(&self.config.download_url)
    }

    // --- Return trip ---

    /// Finish a payment round trip if `location` carries the return marker.
    ///
    /// Shows the thank-you banner, schedules one download after the
    /// configured delay, and rewrites the visible URL without the marker so a
    /// refresh does not download again. Returns whether the marker was found.
    /// Without the marker, or once a return was already handled, nothing
    /// happens.
    pub fn handle_return<T>(&mut self, location: &Url, scheduler: &T) -> Result<bool, SiteError>
    where
        T: Scheduler + ?Sized,
    {
        if !has_return_marker(location) || self.pending.is_some() {
            return Ok(false);
        }

        self.state = GateState::Returned;
        self.banner_visible = true;

        let href = self.return_download_url();
        let browser = self.browser.clone();
        let fired = Rc::new(Cell::new(false));
        let fired_flag = fired.clone();
        let handle = scheduler.schedule(
            self.config.return_delay(),
            Box::new(move || {
                fired_flag.set(true);
                tracing::info!(url = %href, "starting download after return");
                if let Err(e) = browser.activate_download(&href) {
                    tracing::warn!(error = %e, "download after return failed");
                }
            }),
        );
        self.pending = Some(PendingDownload {
            _handle: handle,
            fired,
        });

        let clean = strip_return_marker(location);
        tracing::debug!(url = %clean, "removing return marker");
        self.browser.replace_url(clean.as_str())?;
        Ok(true)
    }

    pub fn dismiss_banner(&mut self) {
        self.banner_visible = false;
    }

    /// Drop a scheduled post-return download that has not fired yet.
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.fired.get() {
                tracing::debug!("cancelled pending download");
                self.state = GateState::Idle;
            }
        }
    }

    /// Download URL for the return trip: the one stashed before leaving, if
    /// it is still a valid URL, else the configured one.
    fn return_download_url(&self) -> String {
        pending_download(&self.session)
            .filter(|href| Url::parse(href).is_ok())
            .unwrap_or_else(|| self.config.download_url.clone())
    }
}

/// Whether `url` carries `thanks=true`. Only that exact value counts.
pub fn has_return_marker(url: &Url) -> bool {
    url.query_pairs()
        .any(|(k, v)| k == RETURN_PARAM && v == RETURN_VALUE)
}

/// `url` with every `thanks` parameter removed. Other parameters keep their
/// original encoding and order, and the fragment is kept; an emptied query
/// is dropped entirely.
pub fn strip_return_marker(url: &Url) -> Url {
    let kept: Vec<&str> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty() && !is_return_param(segment))
        .collect();

    let mut clean = url.clone();
    if kept.is_empty() {
        clean.set_query(None);
    } else {
        clean.set_query(Some(&kept.join("&")));
    }
    clean
}

/// Whether a raw `key=value` query segment has the return marker's key.
fn is_return_param(segment: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == RETURN_PARAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_marker_requires_exact_value() {
        assert!(has_return_marker(&url("https://site.test/?thanks=true")));
        assert!(has_return_marker(&url("https://site.test/?a=1&thanks=true")));
        assert!(!has_return_marker(&url("https://site.test/?thanks=TRUE")));
        assert!(!has_return_marker(&url("https://site.test/?thanks=1")));
        assert!(!has_return_marker(&url("https://site.test/?thanks")));
        assert!(!has_return_marker(&url("https://site.test/")));
    }

    #[test]
    fn test_strip_marker_only() {
        assert_eq!(
            strip_return_marker(&url("https://site.test/download.html?thanks=true")).as_str(),
            "https://site.test/download.html"
        );
        assert_eq!(
            strip_return_marker(&url("https://site.test/?ref=x&thanks=true#top")).as_str(),
            "https://site.test/?ref=x#top"
        );
    }

    #[test]
    fn test_strip_marker_keeps_other_params_verbatim() {
        assert_eq!(
            strip_return_marker(&url("https://site.test/?flag&q=a%20b&thanks=true&x=1+2")).as_str(),
            "https://site.test/?flag&q=a%20b&x=1+2"
        );
        assert_eq!(
            strip_return_marker(&url("https://site.test/?thanks&thanks=true")).as_str(),
            "https://site.test/"
        );
        assert_eq!(
            strip_return_marker(&url("https://site.test/?thanksgiving=1&thanks=true")).as_str(),
            "https://site.test/?thanksgiving=1"
        );
    }
}
