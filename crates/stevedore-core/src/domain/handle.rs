//! TaskHandle - ある時点でのタスクのスナップショット
//!
//! # 状態遷移（観測するだけで、所有はしない）
//! - pending → running → stopping → stopped
//! - pending → stopped（配置失敗時）
//!
//! TaskHandle はローカルで更新されません。最新の状態は毎回 `describe` で取得します。

use super::raw::RawResponse;

/// Coarse lifecycle phase derived from a reported status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Pending,
    Running,
    /// Shutdown requested or in progress; containers may still be running.
    Stopping,
    /// Terminated.
    Stopped,
    /// A status this crate does not recognise.
    Unknown,
}

impl LifecyclePhase {
    pub fn from_status(status: &str) -> Self {
        match status {
            "PROVISIONING" | "PENDING" | "ACTIVATING" => LifecyclePhase::Pending,
            "RUNNING" => LifecyclePhase::Running,
            "DEACTIVATING" | "STOPPING" | "DEPROVISIONING" => LifecyclePhase::Stopping,
            "STOPPED" | "DELETED" => LifecyclePhase::Stopped,
            _ => LifecyclePhase::Unknown,
        }
    }
}

/// Point-in-time snapshot of a remote task.
///
/// `status` is exactly what the control plane reported. For a handle returned by
/// `stop` it is the status at acceptance time, which may still be `RUNNING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    arn: String,
    status: String,
    raw: RawResponse,
}

impl TaskHandle {
    pub fn new(arn: String, status: String, raw: RawResponse) -> Self {
        Self { arn, status, raw }
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Status string exactly as reported.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn phase(&self) -> LifecyclePhase {
        LifecyclePhase::from_status(&self.status)
    }

    /// The full response this snapshot was read from.
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    /// Last path segment of the ARN (the short task id).
    pub fn task_id(&self) -> &str {
        self.arn.rsplit('/').next().unwrap_or(&self.arn)
    }
}
