/// Error types shared by the gatekeeper and the popup workflow
use serde_json::Value;
use thiserror::Error;

/// A browser extension API call failed (messaging, tabs, action)
#[derive(Debug, Clone, PartialEq, Error)]
#[error("browser call failed: {0}")]
pub struct HostError(pub String);

/// Body of an error returned by the wiki
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub error_type: Option<String>,
    pub raw: Value,
}

impl ErrorBody {
    /// Read `title`/`detail`/`type` from a REST error, or `error.code`/`error.info`
    /// from an action API error.
    pub fn from_json(raw: Value) -> ErrorBody {
        let field = |v: &Value, name: &str| v.get(name).and_then(Value::as_str).map(str::to_string);

        if let Some(error) = raw.get("error").filter(|e| e.is_object()) {
            return ErrorBody {
                title: field(error, "code"),
                detail: field(error, "info"),
                error_type: None,
                raw: raw.clone(),
            };
        }

        ErrorBody {
            title: field(&raw, "title"),
            detail: field(&raw, "detail"),
            error_type: field(&raw, "type"),
            raw,
        }
    }

    /// Human-readable reason: detail, then title, then type, then the JSON itself
    pub fn describe(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .or_else(|| self.error_type.clone())
            .unwrap_or_else(|| match &self.raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("wiki returned an error: {}", .0.describe())]
    Rejected(ErrorBody),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// The wiki's error title (or action API error code), if any
    pub fn title(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(body) => body.title.as_deref(),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ApiError::Rejected(body) => body.describe(),
            ApiError::Transport(msg) | ApiError::Malformed(msg) => msg.clone(),
        }
    }
}

impl From<HostError> for ApiError {
    fn from(e: HostError) -> Self {
        ApiError::Transport(e.0)
    }
}
