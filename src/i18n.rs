/// UI strings: live from the wiki's `allmessages` API, bundled English as fallback
use crate::api::WikiApi;
use crate::http::HttpClient;
use serde_json::Value;
use std::collections::HashMap;

pub const ENABLE_SYNC: &str = "readinglists-browser-enable-sync-prompt";
pub const ENTRY_LIMIT_EXCEEDED: &str = "readinglists-browser-list-entry-limit-exceeded";
pub const ERROR_INTRO: &str = "readinglists-browser-error-intro";
pub const INFO_LINK_TEXT: &str = "readinglists-browser-extension-info-link-text";
pub const LOGIN_BUTTON_TEXT: &str = "login";
pub const LOGIN_PROMPT: &str = "readinglists-browser-login-prompt";
pub const SUCCESS: &str = "readinglists-browser-add-entry-success";

const BUNDLED_EN: &str = include_str!("../i18n/en.json");

/// Resolved message texts by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Messages {
    texts: HashMap<String, String>,
}

impl Messages {
    /// Text for `key`, or the key itself when nothing is known about it
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.texts.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn insert(&mut self, key: &str, text: String) {
        self.texts.insert(key.to_string(), text);
    }
}

/// Messages shipped with the extension, restricted to `keys`
///
/// Only English is bundled; any other `lang` gets the English text.
pub fn bundled_messages(lang: &str, keys: &[&str]) -> Messages {
    if lang != "en" {
        log::debug!("no bundled messages for {}, using en", lang);
    }

    let all: HashMap<String, Value> = match serde_json::from_str(BUNDLED_EN) {
        Ok(all) => all,
        Err(e) => {
            log::warn!("bundled messages are invalid: {}", e);
            HashMap::new()
        }
    };

    let mut messages = Messages::default();
    for key in keys {
        if let Some(text) = all.get(*key).and_then(Value::as_str) {
            messages.insert(key, text.to_string());
        }
    }
    messages
}

/// Read `query.allmessages` from an API response
pub fn parse_allmessages(body: &Value) -> Messages {
    let mut messages = Messages::default();
    let entries = body
        .pointer("/query/allmessages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for entry in entries {
        let name = entry.get("name").and_then(Value::as_str);
        let content = entry.get("content").and_then(Value::as_str);
        if let (Some(name), Some(content)) = (name, content) {
            messages.insert(name, content.to_string());
        }
    }
    messages
}

/// Fetch `keys` from the wiki, filling anything missing from the bundled file
///
/// Never fails: a failed or empty response degrades to the bundled strings.
pub async fn resolve<C: HttpClient>(api: &WikiApi<'_, C>, keys: &[&str], fallback_lang: &str) -> Messages {
    let mut messages = bundled_messages(fallback_lang, keys);

    match api.all_messages(keys).await {
        Ok(remote) if !remote.is_empty() => {
            for (key, text) in remote.texts {
                messages.texts.insert(key, text);
            }
        }
        Ok(_) => log::debug!("wiki returned no messages, using bundled {}", fallback_lang),
        Err(e) => log::warn!("could not load messages from wiki: {}", e),
    }
    messages
}
