/// Browser extension APIs used by the background script and the popup
use crate::error::HostError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/browser.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getCurrentTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAllTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setActionVisible(tab_id: i32, visible: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn navigateCurrentTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;
}

/// A browser tab as reported by `tabs.query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
}

/// Requests understood by the content script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type")]
pub enum TabMessage {
    #[serde(rename = "wikiExtensionGetPageNamespace")]
    GetPageNamespace,
    #[serde(rename = "wikiExtensionGetPageTitle")]
    GetPageTitle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceReply {
    pub ns: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleReply {
    pub href: String,
}

/// The subset of the WebExtension API the extension relies on
#[allow(async_fn_in_trait)]
pub trait TabHost {
    async fn current_tab(&self) -> Result<Tab, HostError>;
    async fn tab(&self, tab_id: i32) -> Result<Tab, HostError>;
    async fn all_tabs(&self) -> Result<Vec<Tab>, HostError>;
    async fn send_message(&self, tab_id: i32, message: TabMessage) -> Result<Value, HostError>;
    async fn set_action_visible(&self, tab_id: i32, visible: bool) -> Result<(), HostError>;
    /// Point the active tab at `url`
    async fn navigate_current_tab(&self, url: &str) -> Result<(), HostError>;
    async fn open_tab(&self, url: &str) -> Result<(), HostError>;
}

/// Ask the content script for the page namespace
pub async fn page_namespace<H: TabHost>(host: &H, tab_id: i32) -> Result<i64, HostError> {
    let reply = host.send_message(tab_id, TabMessage::GetPageNamespace).await?;
    serde_json::from_value::<NamespaceReply>(reply)
        .map(|r| r.ns)
        .map_err(|e| HostError(format!("bad namespace reply: {}", e)))
}

/// Ask the content script for the canonical page URL
pub async fn page_href<H: TabHost>(host: &H, tab_id: i32) -> Result<String, HostError> {
    let reply = host.send_message(tab_id, TabMessage::GetPageTitle).await?;
    serde_json::from_value::<TitleReply>(reply)
        .map(|r| r.href)
        .map_err(|e| HostError(format!("bad title reply: {}", e)))
}

/// `TabHost` backed by the `browser.*` namespace through the JS bridge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserHost;

fn js_error(e: JsValue) -> HostError {
    HostError(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

fn from_js<T: for<'de> Deserialize<'de>>(value: JsValue) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| HostError(format!("Failed to parse: {:?}", e)))
}

impl TabHost for BrowserHost {
    async fn current_tab(&self) -> Result<Tab, HostError> {
        from_js(getCurrentTab().await.map_err(js_error)?)
    }

    async fn tab(&self, tab_id: i32) -> Result<Tab, HostError> {
        from_js(getTab(tab_id).await.map_err(js_error)?)
    }

    async fn all_tabs(&self) -> Result<Vec<Tab>, HostError> {
        from_js(getAllTabs().await.map_err(js_error)?)
    }

    async fn send_message(&self, tab_id: i32, message: TabMessage) -> Result<Value, HostError> {
        let message_js = message
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| HostError(format!("Failed to serialize: {:?}", e)))?;
        let reply = sendTabMessage(tab_id, message_js).await.map_err(js_error)?;
        from_js(reply)
    }

    async fn set_action_visible(&self, tab_id: i32, visible: bool) -> Result<(), HostError> {
        setActionVisible(tab_id, visible).await.map_err(js_error)
    }

    async fn navigate_current_tab(&self, url: &str) -> Result<(), HostError> {
        navigateCurrentTab(url).await.map_err(js_error)
    }

    async fn open_tab(&self, url: &str) -> Result<(), HostError> {
        openTab(url).await.map_err(js_error)
    }
}
