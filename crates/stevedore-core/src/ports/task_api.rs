//! TaskApi port - run / describe / stop の表面
//!
//! 本番では TaskOrchestrator が唯一の実装です。
//! 呼び出し側のテストでは mock 実装に差し替えられます。

use async_trait::async_trait;

use crate::domain::{
    CallOptions, EnvironmentOverrides, RunOptions, TaskDescriptor, TaskError, TaskHandle,
};

/// Task lifecycle operations. Each call is one independent round trip and
/// returns a fresh snapshot; nothing is cached between calls.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Launch exactly one instance of the descriptor's task definition.
    async fn run(
        &self,
        descriptor: &TaskDescriptor,
        overrides: Option<&EnvironmentOverrides>,
        options: RunOptions,
    ) -> Result<TaskHandle, TaskError>;

    /// Current status of `task_id` (ARN or short id) within the descriptor's cluster.
    ///
    /// Tasks stopped longer ago than the control plane's retention window are
    /// no longer returned; see [`TaskError::is_missing`].
    async fn describe(
        &self,
        descriptor: &TaskDescriptor,
        task_id: &str,
        options: CallOptions,
    ) -> Result<TaskHandle, TaskError>;

    /// Request termination.
    ///
    /// Stopping is asynchronous: the handle carries the status reported when
    /// the request was accepted, which may still be `RUNNING`. Poll
    /// `describe` to observe termination.
    async fn stop(
        &self,
        descriptor: &TaskDescriptor,
        task_id: &str,
        options: CallOptions,
    ) -> Result<TaskHandle, TaskError>;
}
