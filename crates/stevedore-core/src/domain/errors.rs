//! Errors - エラー型と分類
//!
//! # 分類
//! - AuthError: 署名・認証情報の失敗（運用者の対応が必要、リトライしない）
//! - ClientError::Transport: non-2xx（5xx / 429 / throttling はリトライ可、その他 4xx は致命的）
//! - TaskError: 操作ごとのエラー（通信失敗、または HTTP は成功したが結果が空）
//!
//! レスポンスを受け取った後のエラーは必ず RawResponse を保持します。
//! リトライは呼び出し側の責務で、ここでは `ErrorKind` による分類だけを提供します。

use std::time::Duration;

use super::raw::RawResponse;
use super::wire::ApiFailure;

/// ErrorKind は呼び出し側のリトライ判断のための分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 一時的なエラー（遅延を入れてリトライしてよい）
    Transient,
    /// 恒久的なエラー（リトライ無意味）
    Permanent,
}

/// Error codes that the control plane sends with a 400 when throttling.
const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("credentials could not be resolved: {0}")]
    Unresolved(String),

    #[error("credentials are incomplete: {0} is empty")]
    Incomplete(&'static str),

    #[error("signing key rejected by hmac")]
    InvalidKey,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("no region given on the call and none configured on the client")]
    MissingRegion,

    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("control plane returned http {status}")]
    Transport { status: u16, raw: RawResponse },

    #[error("request failed before a response arrived: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    #[error("request cancelled by caller")]
    Cancelled,
}

impl ClientError {
    pub(crate) fn transport(raw: RawResponse) -> Self {
        ClientError::Transport {
            status: raw.status,
            raw,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport { status, raw } => {
                if *status >= 500 || *status == 429 {
                    return ErrorKind::Transient;
                }
                match raw.error_code() {
                    Some(code) if THROTTLING_CODES.contains(&code.as_str()) => ErrorKind::Transient,
                    _ => ErrorKind::Permanent,
                }
            }
            ClientError::Network(_) | ClientError::TimedOut(_) => ErrorKind::Transient,
            ClientError::Auth(_)
            | ClientError::MissingRegion
            | ClientError::InvalidEndpoint { .. }
            | ClientError::Encode(_)
            | ClientError::Cancelled => ErrorKind::Permanent,
        }
    }

    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            ClientError::Transport { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Why an orchestrator operation failed.
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// HTTP succeeded but the expected result collection was empty, missing,
    /// or did not contain the requested task.
    #[error("http {} response contained no matching task", .raw.status)]
    Empty {
        failures: Vec<ApiFailure>,
        raw: RawResponse,
    },

    #[error("response could not be decoded: {message}")]
    Malformed { message: String, raw: RawResponse },
}

impl FailureCause {
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            FailureCause::Client(e) => e.raw_response(),
            FailureCause::Empty { raw, .. } | FailureCause::Malformed { raw, .. } => Some(raw),
        }
    }
}

/// Operation-scoped error returned by `run` / `describe` / `stop`.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("failed to run task: {0}")]
    Run(#[source] FailureCause),

    #[error("failed to describe task: {0}")]
    Describe(#[source] FailureCause),

    #[error("failed to stop task: {0}")]
    Stop(#[source] FailureCause),
}

impl TaskError {
    pub fn cause(&self) -> &FailureCause {
        match self {
            TaskError::Run(c) | TaskError::Describe(c) | TaskError::Stop(c) => c,
        }
    }

    /// The underlying client error, if the failure was not semantic.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self.cause() {
            FailureCause::Client(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a non-2xx response.
    pub fn transport_status(&self) -> Option<u16> {
        match self.client_error() {
            Some(ClientError::Transport { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&RawResponse> {
        self.cause().raw_response()
    }

    /// Semantic failures are permanent: repeating the same request yields the
    /// same empty answer.
    pub fn kind(&self) -> ErrorKind {
        match self.cause() {
            FailureCause::Client(e) => e.kind(),
            FailureCause::Empty { .. } | FailureCause::Malformed { .. } => ErrorKind::Permanent,
        }
    }

    /// `describe` was answered with a `MISSING` failure.
    ///
    /// Stopped tasks drop out of the control plane after a retention window
    /// (about an hour), so after enough time this can be a terminal outcome.
    pub fn is_missing(&self) -> bool {
        match self {
            TaskError::Describe(FailureCause::Empty { failures, .. }) => failures
                .iter()
                .any(|f| f.reason.as_deref() == Some("MISSING")),
            _ => false,
        }
    }
}
