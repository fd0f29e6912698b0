//! Domain model (descriptor, capacity, handles, responses, errors).
//!
//! ここには I/O を持たない純粋なデータ型だけを置きます。
//! wire フォーマットの型（wire.rs）は orchestrator からのみ使われます。

pub mod action;
pub mod capacity;
pub mod descriptor;
pub mod errors;
pub mod handle;
pub mod options;
pub mod raw;
pub mod wire;

pub use self::action::Action;
pub use self::capacity::CapacityStrategy;
pub use self::descriptor::{DescriptorError, EnvironmentOverrides, TaskDescriptor};
pub use self::errors::{AuthError, ClientError, ErrorKind, FailureCause, TaskError};
pub use self::handle::{LifecyclePhase, TaskHandle};
pub use self::options::{CallOptions, RunOptions};
pub use self::raw::RawResponse;
