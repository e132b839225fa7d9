//! Page bootstrap: mounts components into host elements of the static page
//! and wires the trigger table.
//!
//! Every piece checks for its own host element and quietly stays off when
//! the page does not have one, so a page missing the gate still gets its
//! nav highlighting and review form.

use std::rc::Rc;

use leptos::*;
use showtools::{
    anchor_target, first_visit, is_active_link, Action, DownloadGate, Notifying, Scheduler,
    SiteConfig, SiteError, Target, Trigger, Typewriter, TRIGGERS,
};
use wasm_bindgen::prelude::*;

use crate::components::{DonationModal, ReviewWidget, ThankYouBanner};
use crate::web::{self, BrowserSession, TimeoutScheduler, WebBrowser};

pub type Gate = DownloadGate<WebBrowser, BrowserSession>;

const MODAL_HOST_ID: &str = "donationModal";
const BANNER_HOST_ID: &str = "thankYouBanner";
const REVIEW_HOST_ID: &str = "reviewForm";
const LOADER_ID: &str = "pageLoader";

/// Attach everything to the current document.
pub fn attach() -> Result<(), SiteError> {
    let document = web::document().ok_or_else(|| SiteError::MissingElement("document".to_string()))?;
    let config = web::load_config(&document);

    settle_loader(&document);
    mark_active_links(&document);
    start_typewriters(&document, &config);
    attach_review(&document, &config);

    let gate = attach_gate(&document, config);
    wire_triggers(&document, gate);
    Ok(())
}

fn host(document: &web_sys::Document, id: &str) -> Option<web_sys::HtmlElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

fn elements(document: &web_sys::Document, selector: &str) -> Vec<web_sys::Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("bad selector: {}", selector);
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into().ok())
        .collect()
}

// --- Download gate ---

fn attach_gate(document: &web_sys::Document, config: SiteConfig) -> Option<RwSignal<Gate>> {
    let Some(modal_host) = host(document, MODAL_HOST_ID) else {
        log::warn!("#{} not found, download gate disabled", MODAL_HOST_ID);
        return None;
    };

    let gate = create_rw_signal(DownloadGate::new(config, WebBrowser, BrowserSession));
    mount_to(modal_host, move || view! { <DonationModal gate=gate /> });

    match host(document, BANNER_HOST_ID) {
        Some(banner_host) => mount_to(banner_host, move || view! { <ThankYouBanner gate=gate /> }),
        None => log::debug!("#{} not found, no thank-you banner", BANNER_HOST_ID),
    }

    if let Some(location) = web::current_location() {
        // The delayed download changes the gate's state; wake its readers.
        let scheduler = Notifying::new(&TimeoutScheduler, move || gate.update(|_| {}));
        if let Some(Err(e)) = gate.try_update(|g| g.handle_return(&location, &scheduler)) {
            log::warn!("Return handling failed: {}", e);
        }
    }

    Some(gate)
}

// --- Trigger table ---

fn wire_triggers(document: &web_sys::Document, gate: Option<RwSignal<Gate>>) {
    for trigger in TRIGGERS {
        if gate.is_none() && trigger.action != Action::ScrollToAnchor {
            continue;
        }
        match trigger.target {
            Target::Document => listen(document, *trigger, gate),
            Target::Window => {
                if let Some(window) = web_sys::window() {
                    listen(&window, *trigger, gate);
                }
            }
            Target::Selector(selector) => {
                for element in elements(document, selector) {
                    listen(&element, *trigger, gate);
                }
            }
        }
    }
}

fn listen(target: &web_sys::EventTarget, trigger: Trigger, gate: Option<RwSignal<Gate>>) {
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        let key = ev.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key());
        if !trigger.accepts_key(key.as_deref()) {
            return;
        }
        if trigger.prevents_default() {
            ev.prevent_default();
        }
        dispatch(trigger.action, &ev, gate);
    });
    let callback: &js_sys::Function = handler.as_ref().unchecked_ref();
    if let Err(e) = target.add_event_listener_with_callback(trigger.event, callback) {
        log::warn!("failed to listen for {}: {:?}", trigger.event, e);
    }
    // Listeners live as long as the page.
    handler.forget();
}

fn dispatch(action: Action, ev: &web_sys::Event, gate: Option<RwSignal<Gate>>) {
    match action {
        Action::OpenGate => {
            if let Some(gate) = gate {
                gate.update(|g| g.open_gate());
            }
        }
        Action::CloseGate => {
            if let Some(gate) = gate {
                if gate.with_untracked(|g| g.is_open()) {
                    gate.update(|g| g.close_gate());
                }
            }
        }
        Action::ScrollToAnchor => scroll_to_anchor(ev),
        Action::Teardown => {
            if let Some(gate) = gate {
                gate.update_untracked(|g| g.cancel_pending());
            }
        }
    }
}

fn scroll_to_anchor(ev: &web_sys::Event) {
    let Some(anchor) = ev
        .current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    else {
        return;
    };
    let href = anchor.get_attribute("href").unwrap_or_default();
    let Some(target) = anchor_target(&href).and_then(|id| web::document()?.get_element_by_id(id))
    else {
        return;
    };

    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(web_sys::ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

// --- Page touches ---

/// First load of the session keeps the loader and lets it play; later loads
/// drop it immediately.
fn settle_loader(document: &web_sys::Document) {
    let Some(loader) = document.get_element_by_id(LOADER_ID) else {
        return;
    };
    if first_visit(&BrowserSession) {
        let _ = loader.class_list().add_1("playing");
    } else {
        loader.remove();
    }
}

fn mark_active_links(document: &web_sys::Document) {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();
    for link in elements(document, ".nav-links a") {
        let href = link.get_attribute("href").unwrap_or_default();
        if is_active_link(&path, &href) {
            let _ = link.class_list().add_1("active");
        }
    }
}

fn start_typewriters(document: &web_sys::Document, config: &SiteConfig) {
    let scheduler: Rc<dyn Scheduler> = Rc::new(TimeoutScheduler);
    for element in elements(document, ".terminal-typing") {
        let Some(text) = element.get_attribute("data-text") else {
            continue;
        };
        Typewriter::new(&text).run(
            scheduler.clone(),
            config.typing_interval(),
            config.typing_linger(),
            move |visible, typing| {
                element.set_text_content(Some(visible));
                let classes = element.class_list();
                let result = if typing {
                    classes.add_1("typing")
                } else {
                    classes.remove_1("typing")
                };
                if let Err(e) = result {
                    log::debug!("typing class toggle failed: {:?}", e);
                }
            },
        );
    }
}

// --- Review ---

fn attach_review(document: &web_sys::Document, config: &SiteConfig) {
    let Some(review_host) = host(document, REVIEW_HOST_ID) else {
        return;
    };
    let recipient = config.review_email.clone();
    mount_to(review_host, move || view! { <ReviewWidget recipient=recipient /> });
}
