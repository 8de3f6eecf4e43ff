//! Caller session extractor (`X-Session-Id` header).

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const SESSION_HEADER: &str = "x-session-id";

/// The caller's session identifier, when the client sent one.
#[derive(Debug, Clone, Default)]
pub struct ClientSession(pub Option<String>);

impl ClientSession {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        Ok(ClientSession(session))
    }
}
