//! stevedore-core
//!
//! Signed control-plane client and task lifecycle facade for container tasks.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（descriptor, capacity, handle, raw response, wire, errors）
//! - **ports**: 抽象化レイヤー（Clock, CredentialProvider, HttpTransport, TaskApi）
//! - **app**: アプリケーションロジック（signer, config, client, orchestrator）
//! - **impls**: 実装（ReqwestTransport, StaticCredentials, ScriptedTransport など）

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;

pub use app::{ClientConfig, ControlPlaneClient, TaskOrchestrator};
pub use domain::{
    CallOptions, CapacityStrategy, ClientError, EnvironmentOverrides, ErrorKind, RunOptions,
    TaskDescriptor, TaskError, TaskHandle,
};
pub use ports::TaskApi;
