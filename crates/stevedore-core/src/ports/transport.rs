//! HttpTransport port - 署名済みリクエストを送る
//!
//! Transport は status code を解釈しません。non-2xx の判定は client の責務です。
//! 1 回の `send` は必ず 1 回の HTTP 送信に対応します（リトライしない）。

use async_trait::async_trait;

use crate::domain::RawResponse;

/// A fully signed request, ready to put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    /// Header names are lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// The request never produced a response (DNS, TLS, connection reset, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportFailure(pub String);

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure>;
}
