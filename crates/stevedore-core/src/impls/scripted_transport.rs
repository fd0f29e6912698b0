//! ScriptedTransport - 開発・テスト用の transport
//!
//! # 実装詳細
//! - 登録順にレスポンスを返す（VecDeque）
//! - スクリプトが尽きたら fallback を返す。fallback もなければ TransportFailure
//! - 送られたリクエストはすべて記録する（署名や body の検証用）
//!
//! # 使用例
//! ```ignore
//! let transport = ScriptedTransport::new()
//!     .respond(RawResponse::new(200, r#"{"tasks":[...]}"#));
//! let client = ControlPlaneClient::builder().transport(transport.clone())...;
//! assert_eq!(transport.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::RawResponse;
use crate::ports::{HttpRequest, HttpTransport, TransportFailure};

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<RawResponse, TransportFailure>>,
    fallback: Option<RawResponse>,
    requests: Vec<HttpRequest>,
}

/// Cloning shares the script and the request log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, response: RawResponse) -> Self {
        self.lock().responses.push_back(Ok(response));
        self
    }

    /// Queue a failure that never produced a response.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.lock()
            .responses
            .push_back(Err(TransportFailure(message.into())));
        self
    }

    /// Response replayed once the queue is empty.
    pub fn always(self, response: RawResponse) -> Self {
        self.lock().fallback = Some(response);
        self
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportFailure> {
        let next = {
            let mut script = self.lock();
            script.requests.push(request);
            match script.responses.pop_front() {
                Some(next) => next,
                None => script
                    .fallback
                    .clone()
                    .ok_or_else(|| TransportFailure("script exhausted".to_string())),
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next
    }
}
