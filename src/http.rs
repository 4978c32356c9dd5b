/// Minimal HTTP layer over `window.fetch`
use crate::error::ApiError;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

/// Status and parsed JSON body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> HttpResponse {
        HttpResponse { status, body }
    }

    #[cfg(test)]
    pub fn ok(body: Value) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    /// 2xx or 3xx
    pub fn is_success(&self) -> bool {
        (200..=399).contains(&self.status)
    }

    /// Turn a failed status into `ApiError::Rejected` carrying the body
    pub fn into_result(self) -> Result<Value, ApiError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::Rejected(crate::error::ErrorBody::from_json(self.body)))
        }
    }
}

/// Same-origin JSON requests against a wiki
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ApiError>;
}

/// `HttpClient` on top of the page's `fetch`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchClient;

fn js_error(e: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl FetchClient {
    async fn send(&self, url: &str, init: RequestInit) -> Result<HttpResponse, ApiError> {
        init.set_credentials(RequestCredentials::SameOrigin);
        let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        let body = serde_json::from_str(&text)
            .map_err(|e| ApiError::Malformed(format!("{} (HTTP {})", e, response.status())))?;

        log::debug!("{} -> HTTP {}", url, response.status());
        Ok(HttpResponse::new(response.status(), body))
    }
}

impl HttpClient for FetchClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let init = RequestInit::new();
        init.set_method("GET");
        self.send(url, init).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ApiError> {
        let headers = Headers::new().map_err(js_error)?;
        headers.set("content-type", "application/json").map_err(js_error)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&body.to_string().into());
        self.send(url, init).await
    }
}
