//! Raw response retained for diagnostics.

use std::borrow::Cow;

/// Opaque HTTP response as received from the control plane.
///
/// Carried by every error that was produced after a response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// `x-amzn-RequestId`, when the control plane sent one.
    pub request_id: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            request_id: None,
            body: body.into(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body parsed as JSON, or `None` if it is not valid JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Error code from the `__type` field of an error body.
    ///
    /// `"com.amazonaws.ecs#ClusterNotFoundException"` -> `"ClusterNotFoundException"`
    pub fn error_code(&self) -> Option<String> {
        let value = self.json()?;
        let raw = value.get("__type")?.as_str()?;
        let code = raw.rsplit('#').next().unwrap_or(raw);
        Some(code.to_string())
    }
}
