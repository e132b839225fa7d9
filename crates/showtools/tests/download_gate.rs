use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use showtools::gate::{has_return_marker, strip_return_marker};
use showtools::session::PENDING_DOWNLOAD_KEY;
use showtools::{
    DownloadGate, Effect, GateState, ManualScheduler, MemoryBrowser, MemorySessionStore,
    Notifying, Selection, SessionStore, SiteConfig, DOWNLOAD_URL, PAYMENT_LINK,
};
use url::Url;

type Gate = DownloadGate<MemoryBrowser, MemorySessionStore>;

fn gate() -> (Gate, MemoryBrowser, MemorySessionStore) {
    let browser = MemoryBrowser::new();
    let session = MemorySessionStore::new();
    let gate = DownloadGate::new(SiteConfig::default(), browser.clone(), session.clone());
    (gate, browser, session)
}

#[test]
fn test_sub_minimum_presets_keep_confirm_disabled() {
    let (mut gate, _, _) = gate();
    gate.open_gate();
    for cents in 0..250 {
        gate.select_preset(cents);
        assert!(!gate.confirm_enabled(), "{} cents enabled confirm", cents);
        assert_eq!(gate.amount().cents(), 0);
        assert_eq!(gate.confirm_label(), "Buy Me A Beer");
    }
}

#[test]
fn test_valid_presets_enable_confirm_with_label() {
    let (mut gate, _, _) = gate();
    gate.open_gate();
    for (cents, label) in [
        (250, "Buy Me A Beer — $2.50"),
        (300, "Buy Me A Beer — $3.00"),
        (1001, "Buy Me A Beer — $10.01"),
        (123456, "Buy Me A Beer — $1234.56"),
    ] {
        gate.select_preset(cents);
        assert!(gate.confirm_enabled());
        assert_eq!(gate.confirm_label(), label);
    }
}

#[test]
fn test_custom_amount_scenarios() {
    let (mut gate, _, _) = gate();
    gate.open_gate();

    gate.focus_custom();
    gate.select_custom("3.00");
    assert_eq!(gate.amount().cents(), 300);
    assert_eq!(gate.confirm_label(), "Buy Me A Beer — $3.00");
    assert_eq!(gate.selection(), Selection::Custom);

    gate.select_custom("1.00");
    assert_eq!(gate.amount().cents(), 0);
    assert!(!gate.confirm_enabled());
}

#[test]
fn test_custom_amount_in_exponent_notation() {
    let (mut gate, _, _) = gate();
    gate.open_gate();

    gate.select_custom("1e3");
    assert_eq!(gate.amount().cents(), 100000);
    assert!(gate.confirm_enabled());
    assert_eq!(gate.confirm_label(), "Buy Me A Beer — $1000.00");

    gate.select_custom("2.5e-1");
    assert_eq!(gate.amount().cents(), 0);
}

#[test]
fn test_preset_clears_custom_input() {
    let (mut gate, _, _) = gate();
    gate.open_gate();
    gate.select_custom("12");
    gate.select_preset_attr("500");
    assert_eq!(gate.custom_input(), "");
    assert_eq!(gate.selection(), Selection::Preset(500));
    assert_eq!(gate.amount().cents(), 500);

    gate.focus_custom();
    assert_eq!(gate.selection(), Selection::Custom);
    // Focus alone keeps the amount until the field changes.
    assert_eq!(gate.amount().cents(), 500);
}

#[test]
fn test_open_gate_resets_selection() {
    let (mut gate, browser, _) = gate();
    gate.open_gate();
    gate.select_custom("20");
    gate.close_gate();
    assert_eq!(gate.state(), GateState::Idle);

    gate.open_gate();
    assert!(gate.is_open());
    assert_eq!(gate.amount().cents(), 0);
    assert_eq!(gate.selection(), Selection::None);
    assert_eq!(gate.custom_input(), "");
    assert!(!gate.confirm_enabled());

    assert_eq!(
        browser.effects(),
        vec![
            Effect::ScrollLock(true),
            Effect::ScrollLock(false),
            Effect::ScrollLock(true)
        ]
    );
}

#[test]
fn test_confirm_without_amount_is_noop() {
    let (mut gate, browser, session) = gate();
    gate.open_gate();
    browser.clear();

    assert_eq!(gate.confirm_donation().unwrap(), None);
    assert!(browser.effects().is_empty());
    assert_eq!(session.get(PENDING_DOWNLOAD_KEY), None);
    assert_eq!(gate.state(), GateState::GateOpen);
}

#[test]
fn test_confirm_redirects_with_amount() {
    let (mut gate, browser, session) = gate();
    gate.open_gate();
    gate.select_preset(500);

    let url = gate.confirm_donation().unwrap().unwrap();
    let expected = format!("{}?prefilled_amount=500", PAYMENT_LINK);
    assert_eq!(url.as_str(), expected);
    assert_eq!(browser.last_navigation().as_deref(), Some(expected.as_str()));
    assert_eq!(session.get(PENDING_DOWNLOAD_KEY).as_deref(), Some(DOWNLOAD_URL));
    assert_eq!(gate.state(), GateState::AwaitingExternalPayment);
    assert!(browser.downloads().is_empty());
}

#[test]
fn test_skip_downloads_immediately() {
    let (mut gate, browser, _) = gate();
    gate.open_gate();
    gate.skip_donation().unwrap();

    assert!(!gate.is_open());
    assert_eq!(gate.state(), GateState::Downloading);
    assert_eq!(browser.downloads(), vec![DOWNLOAD_URL.to_string()]);
    assert_eq!(browser.last_navigation(), None);
    assert!(browser.effects().contains(&Effect::ScrollLock(false)));
}

#[test]
fn test_return_with_marker() {
    let (mut gate, browser, _) = gate();
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/download.html?thanks=true").unwrap();

    assert!(gate.handle_return(&location, &scheduler).unwrap());
    assert!(gate.banner_visible());
    assert_eq!(gate.state(), GateState::Returned);
    assert_eq!(scheduler.pending(), 1);
    assert!(browser.downloads().is_empty());
    assert!(browser
        .effects()
        .contains(&Effect::ReplaceUrl("https://showtools.test/download.html".to_string())));

    scheduler.advance(Duration::from_millis(999));
    assert!(browser.downloads().is_empty());
    scheduler.advance(Duration::from_millis(1));
    assert_eq!(browser.downloads(), vec![DOWNLOAD_URL.to_string()]);
    assert_eq!(gate.state(), GateState::Downloading);

    // The rewritten URL no longer carries the marker.
    let clean = Url::parse("https://showtools.test/download.html").unwrap();
    assert!(!gate.handle_return(&clean, &scheduler).unwrap());
    scheduler.advance(Duration::from_secs(5));
    assert_eq!(browser.downloads().len(), 1);
}

#[test]
fn test_return_download_notifies_observer() {
    let (mut gate, browser, _) = gate();
    let scheduler = ManualScheduler::new();
    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    let notifying = Notifying::new(&scheduler, move || counter.set(counter.get() + 1));
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();

    assert!(gate.handle_return(&location, &notifying).unwrap());
    assert_eq!(notified.get(), 0);

    scheduler.advance(Duration::from_millis(1000));
    assert_eq!(notified.get(), 1);
    assert_eq!(gate.state(), GateState::Downloading);
    assert_eq!(browser.downloads().len(), 1);
}

#[test]
fn test_return_twice_with_marker_schedules_once() {
    let (mut gate, browser, _) = gate();
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();

    assert!(gate.handle_return(&location, &scheduler).unwrap());
    assert!(!gate.handle_return(&location, &scheduler).unwrap());
    scheduler.advance(Duration::from_secs(2));
    assert_eq!(browser.downloads().len(), 1);
}

#[test]
fn test_return_without_marker_is_noop() {
    let (mut gate, browser, _) = gate();
    let scheduler = ManualScheduler::new();
    for href in [
        "https://showtools.test/",
        "https://showtools.test/?thanks=false",
        "https://showtools.test/?thanks=yes&x=1",
    ] {
        let location = Url::parse(href).unwrap();
        assert!(!gate.handle_return(&location, &scheduler).unwrap());
    }
    assert!(!gate.banner_visible());
    assert_eq!(scheduler.pending(), 0);
    assert!(browser.effects().is_empty());
    assert_eq!(gate.state(), GateState::Idle);
}

#[test]
fn test_return_uses_stashed_download_url() {
    let (mut gate, browser, session) = gate();
    session
        .set(PENDING_DOWNLOAD_KEY, "https://mirror.test/ResolumeHud.exe")
        .unwrap();
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();

    gate.handle_return(&location, &scheduler).unwrap();
    scheduler.advance(Duration::from_secs(1));
    assert_eq!(
        browser.downloads(),
        vec!["https://mirror.test/ResolumeHud.exe".to_string()]
    );
}

#[test]
fn test_cancel_pending_return_download() {
    let (mut gate, browser, _) = gate();
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();

    gate.handle_return(&location, &scheduler).unwrap();
    gate.cancel_pending();
    scheduler.advance(Duration::from_secs(2));
    assert!(browser.downloads().is_empty());
    assert_eq!(gate.state(), GateState::Idle);
}

#[test]
fn test_dismiss_banner() {
    let (mut gate, _, _) = gate();
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();
    gate.handle_return(&location, &scheduler).unwrap();
    gate.dismiss_banner();
    assert!(!gate.banner_visible());
}

#[test]
fn test_marker_helpers_agree() {
    let location = Url::parse("https://showtools.test/a?thanks=true&utm=x").unwrap();
    assert!(has_return_marker(&location));
    let clean = strip_return_marker(&location);
    assert!(!has_return_marker(&clean));
    assert_eq!(clean.query(), Some("utm=x"));
}

#[test]
fn test_custom_return_delay() {
    let config = SiteConfig {
        return_delay_ms: 10,
        ..SiteConfig::default()
    };
    let browser = MemoryBrowser::new();
    let mut gate = DownloadGate::new(config, browser.clone(), MemorySessionStore::new());
    let scheduler = ManualScheduler::new();
    let location = Url::parse("https://showtools.test/?thanks=true").unwrap();

    gate.handle_return(&location, &scheduler).unwrap();
    scheduler.advance(Duration::from_millis(10));
    assert_eq!(browser.downloads().len(), 1);
}
