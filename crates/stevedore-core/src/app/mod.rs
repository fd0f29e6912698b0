//! App - アプリケーション層
//!
//! ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **RequestSigner**: action + body を署名済みリクエストに変換
//! - **ClientConfig**: region / endpoint / timeout の解決
//! - **ControlPlaneClient**: 署名して送信し、non-2xx を Transport エラーにする
//! - **TaskOrchestrator**: run / describe / stop（TaskApi の実装）
//!
//! 制御の流れ: TaskOrchestrator → ControlPlaneClient → RequestSigner → HttpTransport

pub mod builder;
pub mod client;
pub mod config;
pub mod orchestrator;
pub mod signer;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ControlPlaneClientBuilder};
pub use self::client::ControlPlaneClient;
pub use self::config::{ClientConfig, Endpoint};
pub use self::orchestrator::TaskOrchestrator;
pub use self::signer::RequestSigner;
