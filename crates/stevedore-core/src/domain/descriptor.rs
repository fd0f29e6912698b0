//! TaskDescriptor - プロビジョニング層から渡されるタスク設定
//!
//! TaskDescriptor は deploy 時に一度だけ作られ、このクレートは決して変更しません。
//! 識別子（cluster ARN など）がリモートに実在するかの検証は行いません。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-container environment overrides: container name -> (variable -> value).
///
/// Entries for containers that are not in the descriptor are ignored.
pub type EnvironmentOverrides = HashMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("task descriptor must name at least one container")]
    NoContainers,

    #[error("task descriptor must name at least one subnet")]
    NoSubnets,
}

/// Where and how to launch a task.
///
/// Deserializes from the link-data blob produced at provisioning time:
///
/// ```ignore
/// {
///   "cluster": "arn:aws:ecs:us-east-1:123456789012:cluster/app",
///   "taskDefinition": "arn:aws:ecs:us-east-1:123456789012:task-definition/app:3",
///   "subnets": ["subnet-1"],
///   "securityGroups": ["sg-1"],
///   "assignPublicIp": false,
///   "containers": ["app"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorFields", into = "DescriptorFields")]
pub struct TaskDescriptor {
    cluster: String,
    task_definition: String,
    subnets: Vec<String>,
    security_groups: Vec<String>,
    assign_public_ip: bool,
    containers: Vec<String>,
}

impl TaskDescriptor {
    pub fn new(
        cluster: impl Into<String>,
        task_definition: impl Into<String>,
        subnets: Vec<String>,
        security_groups: Vec<String>,
        assign_public_ip: bool,
        containers: Vec<String>,
    ) -> Result<Self, DescriptorError> {
        if containers.is_empty() {
            return Err(DescriptorError::NoContainers);
        }
        if subnets.is_empty() {
            return Err(DescriptorError::NoSubnets);
        }
        Ok(Self {
            cluster: cluster.into(),
            task_definition: task_definition.into(),
            subnets,
            security_groups,
            assign_public_ip,
            containers,
        })
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn task_definition(&self) -> &str {
        &self.task_definition
    }

    pub fn subnets(&self) -> &[String] {
        &self.subnets
    }

    pub fn security_groups(&self) -> &[String] {
        &self.security_groups
    }

    pub fn assign_public_ip(&self) -> bool {
        self.assign_public_ip
    }

    /// Never empty.
    pub fn containers(&self) -> &[String] {
        &self.containers
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorFields {
    cluster: String,
    task_definition: String,
    subnets: Vec<String>,
    #[serde(default)]
    security_groups: Vec<String>,
    #[serde(default)]
    assign_public_ip: bool,
    containers: Vec<String>,
}

impl TryFrom<DescriptorFields> for TaskDescriptor {
    type Error = DescriptorError;

    fn try_from(f: DescriptorFields) -> Result<Self, Self::Error> {
        TaskDescriptor::new(
            f.cluster,
            f.task_definition,
            f.subnets,
            f.security_groups,
            f.assign_public_ip,
            f.containers,
        )
    }
}

impl From<TaskDescriptor> for DescriptorFields {
    fn from(d: TaskDescriptor) -> Self {
        Self {
            cluster: d.cluster,
            task_definition: d.task_definition,
            subnets: d.subnets,
            security_groups: d.security_groups,
            assign_public_ip: d.assign_public_ip,
            containers: d.containers,
        }
    }
}
