/// Background-script entry points, called from `js/background.js`
use crate::config::ExtensionConfig;
use crate::host::{BrowserHost, Tab};
use crate::page_action::PageActionGate;
use wasm_bindgen::prelude::*;

fn gate() -> PageActionGate<BrowserHost> {
    PageActionGate::new(BrowserHost, ExtensionConfig::bundled())
}

fn parse_tab(tab: JsValue) -> Option<Tab> {
    match serde_wasm_bindgen::from_value(tab) {
        Ok(tab) => Some(tab),
        Err(e) => {
            log::warn!("Failed to parse tab: {:?}", e);
            None
        }
    }
}

/// `runtime.onInstalled` and `runtime.onStartup`
#[wasm_bindgen]
pub async fn handle_startup() {
    gate().refresh_all_tabs().await;
}

#[wasm_bindgen]
pub async fn handle_tab_created(tab: JsValue) {
    if let Some(tab) = parse_tab(tab) {
        gate().on_tab_created(&tab).await;
    }
}

#[wasm_bindgen]
pub async fn handle_tab_updated(tab: JsValue, status: Option<String>) {
    if let Some(tab) = parse_tab(tab) {
        gate().on_tab_updated(&tab, status.as_deref()).await;
    }
}

#[wasm_bindgen]
pub async fn handle_tab_activated(tab_id: i32) {
    gate().on_tab_activated(tab_id).await;
}
