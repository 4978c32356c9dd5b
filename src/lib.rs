/// Wiki Reading Lists - save Wikipedia/Wikivoyage articles to a reading list
/// Built with Rust + WASM + Yew

pub mod api;
pub mod background;
pub mod config;
pub mod error;
pub mod host;
pub mod http;
pub mod i18n;
pub mod page_action;
pub mod reading_list;
pub mod session;
pub mod title;
pub mod ui;
pub mod workflow;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
