/// In-memory `HttpClient` and `TabHost` for tests
use crate::error::{ApiError, HostError};
use crate::host::{Tab, TabHost, TabMessage};
use crate::http::{HttpClient, HttpResponse};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

struct Route {
    method: Method,
    needle: String,
    response: Result<HttpResponse, ApiError>,
}

/// Answers requests from routes matched by URL substring, first match wins
#[derive(Default)]
pub struct MockClient {
    routes: Vec<Route>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get(mut self, needle: &str, body: Value) -> Self {
        self.routes.push(Route {
            method: Method::Get,
            needle: needle.to_string(),
            response: Ok(HttpResponse::ok(body)),
        });
        self
    }

    pub fn with_get_response(mut self, needle: &str, response: Result<HttpResponse, ApiError>) -> Self {
        self.routes.push(Route {
            method: Method::Get,
            needle: needle.to_string(),
            response,
        });
        self
    }

    pub fn with_post(mut self, needle: &str, response: HttpResponse) -> Self {
        self.routes.push(Route {
            method: Method::Post,
            needle: needle.to_string(),
            response: Ok(response),
        });
        self
    }

    /// CSRF token route
    pub fn with_token(self, token: &str) -> Self {
        self.with_get("meta=tokens", json!({"query": {"tokens": {"csrftoken": token}}}))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn urls(&self, method: Method) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .map(|r| r.url)
            .collect()
    }

    fn respond(&self, method: Method, url: &str, body: Option<&Value>) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.routes
            .iter()
            .find(|route| route.method == method && url.contains(&route.needle))
            .map(|route| route.response.clone())
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no route for {}", url))))
    }
}

impl HttpClient for MockClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        self.respond(Method::Get, url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ApiError> {
        self.respond(Method::Post, url, Some(body))
    }
}

/// Tabs and content-script replies held in memory
#[derive(Default)]
pub struct MockHost {
    current: Option<Tab>,
    tabs: Vec<Tab>,
    replies: HashMap<(i32, TabMessage), Value>,
    pub visibility: RefCell<Vec<(i32, bool)>>,
    pub navigations: RefCell<Vec<String>>,
    pub opened: RefCell<Vec<String>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `url` the active tab (and a known tab)
    pub fn with_current_tab(mut self, id: i32, url: &str) -> Self {
        let tab = Tab {
            id,
            url: Some(url.to_string()),
        };
        self.current = Some(tab.clone());
        self.tabs.push(tab);
        self
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.tabs.push(tab);
        self
    }

    pub fn with_reply(mut self, tab_id: i32, message: TabMessage, reply: Value) -> Self {
        self.replies.insert((tab_id, message), reply);
        self
    }

    pub fn with_namespace(self, tab_id: i32, ns: i64) -> Self {
        self.with_reply(tab_id, TabMessage::GetPageNamespace, json!({ "ns": ns }))
    }

    pub fn with_canonical_href(self, tab_id: i32, href: &str) -> Self {
        self.with_reply(tab_id, TabMessage::GetPageTitle, json!({ "href": href }))
    }

    /// Last visibility set for `tab_id`
    pub fn action_visible(&self, tab_id: i32) -> Option<bool> {
        self.visibility
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| *id == tab_id)
            .map(|(_, visible)| *visible)
    }
}

impl TabHost for MockHost {
    async fn current_tab(&self) -> Result<Tab, HostError> {
        self.current.clone().ok_or_else(|| HostError("no active tab".to_string()))
    }

    async fn tab(&self, tab_id: i32) -> Result<Tab, HostError> {
        self.tabs
            .iter()
            .find(|t| t.id == tab_id)
            .cloned()
            .ok_or_else(|| HostError(format!("no tab {}", tab_id)))
    }

    async fn all_tabs(&self) -> Result<Vec<Tab>, HostError> {
        Ok(self.tabs.clone())
    }

    async fn send_message(&self, tab_id: i32, message: TabMessage) -> Result<Value, HostError> {
        self.replies
            .get(&(tab_id, message))
            .cloned()
            .ok_or_else(|| HostError("Could not establish connection. Receiving end does not exist.".to_string()))
    }

    async fn set_action_visible(&self, tab_id: i32, visible: bool) -> Result<(), HostError> {
        self.visibility.borrow_mut().push((tab_id, visible));
        Ok(())
    }

    async fn navigate_current_tab(&self, url: &str) -> Result<(), HostError> {
        self.navigations.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<(), HostError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}
