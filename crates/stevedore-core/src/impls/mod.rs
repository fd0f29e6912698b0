//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ReqwestTransport**: 本番用の HTTP transport
//! - **StaticCredentials / EnvCredentials**: 認証情報の provider
//! - **ScriptedTransport**: 開発・テスト用（レスポンスを再生し、リクエストを記録）

pub mod credentials;
pub mod reqwest_transport;
pub mod scripted_transport;

// 主要な型を再エクスポート
pub use self::credentials::{EnvCredentials, StaticCredentials};
pub use self::reqwest_transport::ReqwestTransport;
pub use self::scripted_transport::ScriptedTransport;
