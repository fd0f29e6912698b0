//! Wire types for the JSON 1.1 control-plane protocol.
//!
//! Data modeling only: request bodies are built in the orchestrator, response
//! bodies are decoded here and interpreted there.

use serde::{Deserialize, Serialize};

// ========================================
// Requests
// ========================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskRequest<'a> {
    pub capacity_provider_strategy: Vec<CapacityProviderStrategyItem>,
    pub cluster: &'a str,
    pub task_definition: &'a str,
    pub network_configuration: NetworkConfiguration<'a>,
    pub overrides: TaskOverride<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityProviderStrategyItem {
    pub capacity_provider: &'static str,
    pub weight: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration<'a> {
    pub awsvpc_configuration: AwsVpcConfiguration<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsVpcConfiguration<'a> {
    pub subnets: &'a [String],
    pub security_groups: &'a [String],
    pub assign_public_ip: AssignPublicIp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

impl From<bool> for AssignPublicIp {
    fn from(enabled: bool) -> Self {
        if enabled {
            AssignPublicIp::Enabled
        } else {
            AssignPublicIp::Disabled
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverride<'a> {
    pub container_overrides: Vec<ContainerOverride<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ContainerOverride<'a> {
    pub name: &'a str,
    pub environment: Vec<KeyValuePair<'a>>,
}

#[derive(Debug, Serialize)]
pub struct KeyValuePair<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DescribeTasksRequest<'a> {
    pub cluster: &'a str,
    pub tasks: [&'a str; 1],
}

#[derive(Debug, Serialize)]
pub struct StopTaskRequest<'a> {
    pub cluster: &'a str,
    pub task: &'a str,
}

// ========================================
// Responses
// ========================================

/// Body of `RunTask` and `DescribeTasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub tasks: Option<Vec<TaskEntry>>,
    #[serde(default)]
    pub failures: Vec<ApiFailure>,
}

/// Body of `StopTask`.
#[derive(Debug, Default, Deserialize)]
pub struct StopTaskResponse {
    #[serde(default)]
    pub task: Option<TaskEntry>,
}

/// One task entry. Both fields are optional on the wire; a handle is only
/// produced when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    #[serde(default, alias = "arn")]
    pub task_arn: Option<String>,
    #[serde(default, alias = "status")]
    pub last_status: Option<String>,
}

/// Entry of the `failures` array (placement failures, missing tasks, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiFailure {
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_public_ip_uses_enum_names() {
        let s = serde_json::to_string(&AssignPublicIp::from(true)).unwrap();
        assert_eq!(s, "\"ENABLED\"");
        let s = serde_json::to_string(&AssignPublicIp::from(false)).unwrap();
        assert_eq!(s, "\"DISABLED\"");
    }

    #[test]
    fn task_entry_accepts_short_field_names() {
        let e: TaskEntry = serde_json::from_str(r#"{"arn":"a","status":"RUNNING"}"#).unwrap();
        assert_eq!(e.task_arn.as_deref(), Some("a"));
        assert_eq!(e.last_status.as_deref(), Some("RUNNING"));
    }

    #[test]
    fn task_list_without_tasks_decodes_to_none() {
        let r: TaskListResponse = serde_json::from_str(
            r#"{"failures":[{"arn":"arn:x","reason":"MISSING"}]}"#,
        )
        .unwrap();
        assert!(r.tasks.is_none());
        assert_eq!(r.failures[0].reason.as_deref(), Some("MISSING"));
    }
}
