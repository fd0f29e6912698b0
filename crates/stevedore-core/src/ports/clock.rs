//! Clock port - 時刻の抽象化
//!
//! 署名は時刻に依存するため、テストでは FixedClock で決定的な署名を作ります。

use chrono::{DateTime, Utc};

/// Clock は現在時刻を提供
///
/// # Thread Safety
/// - `Send + Sync` を要求（client は複数タスクから共有される）
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 本番用: システム時刻
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// テスト用: 常に同じ時刻を返す
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
