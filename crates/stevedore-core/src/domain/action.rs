//! Control-plane actions addressed by the `X-Amz-Target` header.

use std::fmt;

/// Wire version prefix of every action target.
pub const TARGET_PREFIX: &str = "AmazonEC2ContainerServiceV20141113";

/// The control-plane actions this crate knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RunTask,
    DescribeTasks,
    StopTask,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::RunTask => "RunTask",
            Action::DescribeTasks => "DescribeTasks",
            Action::StopTask => "StopTask",
        }
    }

    /// Value of the `X-Amz-Target` header, e.g.
    /// `AmazonEC2ContainerServiceV20141113.RunTask`.
    pub fn target(&self) -> String {
        format!("{}.{}", TARGET_PREFIX, self.name())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_includes_wire_version() {
        assert_eq!(
            Action::DescribeTasks.target(),
            "AmazonEC2ContainerServiceV20141113.DescribeTasks"
        );
        assert_eq!(Action::StopTask.to_string(), "StopTask");
    }
}
