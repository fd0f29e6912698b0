//! Per-call options.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::capacity::CapacityStrategy;

/// Options that apply to one control-plane round trip.
///
/// - `region` takes precedence over the client's configured region.
/// - `timeout` takes precedence over the client's configured timeout.
/// - `cancel` aborts the in-flight request when the token is cancelled.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub region: Option<String>,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Options for `run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub capacity: CapacityStrategy,
    pub call: CallOptions,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: CapacityStrategy) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn call(mut self, call: CallOptions) -> Self {
        self.call = call;
        self
    }
}
