//! web-sys implementations of the browser seams, plus small DOM helpers.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use showtools::schedule::Task;
use showtools::{Browser, Scheduler, SessionStore, SiteConfig, SiteError, TaskHandle, CONFIG_ELEMENT_ID};
use url::Url;
use wasm_bindgen::prelude::*;

pub fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn window() -> Result<web_sys::Window, SiteError> {
    web_sys::window().ok_or_else(|| SiteError::MissingElement("window".to_string()))
}

/// Current page URL, if it parses.
pub fn current_location() -> Option<Url> {
    let href = web_sys::window()?.location().href().ok()?;
    Url::parse(&href).ok()
}

/// Site config from the page's JSON overrides block, or the defaults.
pub fn load_config(document: &web_sys::Document) -> SiteConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return SiteConfig::default();
    };
    let json = element.text_content().unwrap_or_default();
    match SiteConfig::from_json(&json) {
        Ok(config) => {
            log::info!("loaded site config overrides");
            config
        }
        Err(e) => {
            log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            SiteConfig::default()
        }
    }
}

// --- Browser ---

#[derive(Debug, Clone, Copy, Default)]
pub struct WebBrowser;

impl Browser for WebBrowser {
    fn navigate(&self, href: &str) -> Result<(), SiteError> {
        window()?
            .location()
            .set_href(href)
            .map_err(|e| SiteError::Navigation(format!("{:?}", e)))
    }

    fn replace_url(&self, href: &str) -> Result<(), SiteError> {
        let window = window()?;
        let title = window.document().map(|d| d.title()).unwrap_or_default();
        window
            .history()
            .map_err(|e| SiteError::Navigation(format!("No history: {:?}", e)))?
            .replace_state_with_url(&JsValue::NULL, &title, Some(href))
            .map_err(|e| SiteError::Navigation(format!("replaceState failed: {:?}", e)))
    }

    fn activate_download(&self, href: &str) -> Result<(), SiteError> {
        let document = document().ok_or_else(|| SiteError::MissingElement("document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| SiteError::MissingElement("body".to_string()))?;

        let a: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| SiteError::Navigation(format!("Element error: {:?}", e)))?
            .dyn_into()
            .map_err(|_| SiteError::Navigation("Not an anchor element".to_string()))?;

        a.set_href(href);
        a.set_download("");
        body.append_child(&a)
            .map_err(|e| SiteError::Navigation(format!("append failed: {:?}", e)))?;
        a.click();
        body.remove_child(&a)
            .map_err(|e| SiteError::Navigation(format!("remove failed: {:?}", e)))?;
        Ok(())
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = document().and_then(|d| d.body()) else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(e) = result {
            log::warn!("failed to toggle scroll lock: {:?}", e);
        }
    }
}

// --- sessionStorage ---

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Option<String> {
        session_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SiteError> {
        session_storage()
            .ok_or_else(|| SiteError::Storage("sessionStorage unavailable".to_string()))?
            .set_item(key, value)
            .map_err(|e| SiteError::Storage(format!("{:?}", e)))
    }
}

// --- Timers ---

/// `setTimeout` scheduler. Timers are forgotten on creation so a task may
/// drop its own handle while running; cancelling goes through the timer id.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let id = Timeout::new(millis, task).forget();
        TaskHandle::new(move || {
            if let (Some(window), Some(id)) = (web_sys::window(), id.as_f64()) {
                window.clear_timeout_with_handle(id as i32);
            }
        })
    }
}
