use wasm_bindgen::prelude::*;

mod components;
pub mod site;
pub mod web;

/// Initialize the site
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    if let Err(e) = site::attach() {
        log::error!("Site setup failed: {}", e);
    }
}
