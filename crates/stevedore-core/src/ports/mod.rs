//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（時計、認証情報、HTTP、コントロールプレーン）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//! テストではすべて差し替え可能です（FixedClock, StaticCredentials, ScriptedTransport）。

pub mod clock;
pub mod credentials;
pub mod task_api;
pub mod transport;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::credentials::{CredentialProvider, Credentials};
pub use self::task_api::TaskApi;
pub use self::transport::{HttpRequest, HttpTransport, TransportFailure};
