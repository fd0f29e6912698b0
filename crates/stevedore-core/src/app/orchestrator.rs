//! TaskOrchestrator - run / describe / stop
//!
//! # 失敗判定は 2 段階
//! 1. 通信の失敗（ClientError）
//! 2. HTTP 200 だが結果が空（配置失敗などで `tasks: []` が返ることがある）
//!
//! どちらも操作ごとの TaskError（Run / Describe / Stop）になります。
//! 状態はキャッシュせず、呼び出しごとに新しい TaskHandle を返します。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::client::ControlPlaneClient;
use crate::domain::wire::{
    ApiFailure, AwsVpcConfiguration, CapacityProviderStrategyItem, ContainerOverride,
    DescribeTasksRequest, KeyValuePair, NetworkConfiguration, RunTaskRequest, StopTaskRequest,
    StopTaskResponse, TaskEntry, TaskListResponse, TaskOverride,
};
use crate::domain::{
    Action, CallOptions, CapacityStrategy, ClientError, EnvironmentOverrides, FailureCause,
    RawResponse, RunOptions, TaskDescriptor, TaskError, TaskHandle,
};
use crate::ports::TaskApi;

pub struct TaskOrchestrator {
    client: Arc<ControlPlaneClient>,
}

impl TaskOrchestrator {
    pub fn new(client: Arc<ControlPlaneClient>) -> Self {
        Self { client }
    }

    async fn call<B: Serialize>(
        &self,
        action: Action,
        body: &B,
        options: &CallOptions,
    ) -> Result<RawResponse, FailureCause> {
        let body = serde_json::to_vec(body).map_err(ClientError::from)?;
        Ok(self.client.invoke(action, body, options).await?)
    }
}

#[async_trait]
impl TaskApi for TaskOrchestrator {
    async fn run(
        &self,
        descriptor: &TaskDescriptor,
        overrides: Option<&EnvironmentOverrides>,
        options: RunOptions,
    ) -> Result<TaskHandle, TaskError> {
        let request = run_request(descriptor, overrides, options.capacity);
        let raw = self
            .call(Action::RunTask, &request, &options.call)
            .await
            .map_err(TaskError::Run)?;

        let handle = first_task(raw).map_err(TaskError::Run)?;
        info!(arn = handle.arn(), status = handle.status(), "task launched");
        Ok(handle)
    }

    async fn describe(
        &self,
        descriptor: &TaskDescriptor,
        task_id: &str,
        options: CallOptions,
    ) -> Result<TaskHandle, TaskError> {
        let request = DescribeTasksRequest {
            cluster: descriptor.cluster(),
            tasks: [task_id],
        };
        let raw = self
            .call(Action::DescribeTasks, &request, &options)
            .await
            .map_err(TaskError::Describe)?;

        let handle = matching_task(raw, task_id).map_err(TaskError::Describe)?;
        info!(arn = handle.arn(), status = handle.status(), "task described");
        Ok(handle)
    }

    async fn stop(
        &self,
        descriptor: &TaskDescriptor,
        task_id: &str,
        options: CallOptions,
    ) -> Result<TaskHandle, TaskError> {
        let request = StopTaskRequest {
            cluster: descriptor.cluster(),
            task: task_id,
        };
        let raw = self
            .call(Action::StopTask, &request, &options)
            .await
            .map_err(TaskError::Stop)?;

        let handle = stopped_task(raw).map_err(TaskError::Stop)?;
        info!(arn = handle.arn(), status = handle.status(), "task stop accepted");
        Ok(handle)
    }
}

/// Single-instance launch request.
pub(crate) fn run_request<'a>(
    descriptor: &'a TaskDescriptor,
    overrides: Option<&'a EnvironmentOverrides>,
    capacity: CapacityStrategy,
) -> RunTaskRequest<'a> {
    if let Some(overrides) = overrides {
        for name in overrides.keys() {
            if !descriptor.containers().contains(name) {
                debug!(container = %name, "ignoring overrides for unknown container");
            }
        }
    }

    let container_overrides = descriptor
        .containers()
        .iter()
        .map(|name| ContainerOverride {
            name,
            environment: overrides
                .and_then(|o| o.get(name))
                .map(|vars| {
                    vars.iter()
                        .map(|(name, value)| KeyValuePair { name, value })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    RunTaskRequest {
        capacity_provider_strategy: vec![CapacityProviderStrategyItem {
            capacity_provider: capacity.provider(),
            weight: CapacityStrategy::WEIGHT,
        }],
        cluster: descriptor.cluster(),
        task_definition: descriptor.task_definition(),
        network_configuration: NetworkConfiguration {
            awsvpc_configuration: AwsVpcConfiguration {
                subnets: descriptor.subnets(),
                security_groups: descriptor.security_groups(),
                assign_public_ip: descriptor.assign_public_ip().into(),
            },
        },
        overrides: TaskOverride {
            container_overrides,
        },
    }
}

fn decode<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, FailureCause> {
    serde_json::from_slice(&raw.body).map_err(|e| FailureCause::Malformed {
        message: e.to_string(),
        raw: raw.clone(),
    })
}

/// A handle is only built from an entry that carries both ARN and status.
fn complete(entry: &TaskEntry) -> Option<(&str, &str)> {
    match (entry.task_arn.as_deref(), entry.last_status.as_deref()) {
        (Some(arn), Some(status)) if !arn.is_empty() => Some((arn, status)),
        _ => None,
    }
}

fn empty(failures: Vec<ApiFailure>, raw: RawResponse) -> FailureCause {
    warn!(
        status = raw.status,
        request_id = ?raw.request_id,
        failures = ?failures,
        "http ok but no usable task in response"
    );
    FailureCause::Empty { failures, raw }
}

fn first_task(raw: RawResponse) -> Result<TaskHandle, FailureCause> {
    let body: TaskListResponse = decode(&raw)?;
    let found = body
        .tasks
        .as_deref()
        .and_then(|tasks| tasks.first())
        .and_then(complete)
        .map(|(arn, status)| (arn.to_string(), status.to_string()));

    match found {
        Some((arn, status)) => Ok(TaskHandle::new(arn, status, raw)),
        None => Err(empty(body.failures, raw)),
    }
}

fn matching_task(raw: RawResponse, task_id: &str) -> Result<TaskHandle, FailureCause> {
    let body: TaskListResponse = decode(&raw)?;
    let suffix = format!("/{task_id}");
    let found = body
        .tasks
        .iter()
        .flatten()
        .filter_map(complete)
        .find(|(arn, _)| *arn == task_id || arn.ends_with(&suffix))
        .map(|(arn, status)| (arn.to_string(), status.to_string()));

    match found {
        Some((arn, status)) => Ok(TaskHandle::new(arn, status, raw)),
        None => Err(empty(body.failures, raw)),
    }
}

fn stopped_task(raw: RawResponse) -> Result<TaskHandle, FailureCause> {
    let body: StopTaskResponse = decode(&raw)?;
    let found = body
        .task
        .as_ref()
        .and_then(complete)
        .map(|(arn, status)| (arn.to_string(), status.to_string()));

    match found {
        Some((arn, status)) => Ok(TaskHandle::new(arn, status, raw)),
        None => Err(empty(Vec::new(), raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, LifecyclePhase};
    use crate::impls::{ScriptedTransport, StaticCredentials};
    use crate::ports::{Credentials, FixedClock};
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    const CLUSTER: &str = "arn:aws:ecs:us-east-1:123456789012:cluster/app";
    const TASK_ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/app/0123abcd";

    fn descriptor() -> TaskDescriptor {
        TaskDescriptor::new(
            CLUSTER,
            "arn:aws:ecs:us-east-1:123456789012:task-definition/app:3",
            vec!["subnet-1".into(), "subnet-2".into()],
            vec!["sg-1".into()],
            false,
            vec!["app".into(), "sidecar".into()],
        )
        .unwrap()
    }

    fn orchestrator(transport: &ScriptedTransport) -> TaskOrchestrator {
        let client = ControlPlaneClient::builder()
            .region("us-east-1")
            .credentials(StaticCredentials::new(Credentials::new("AKID", "secret")))
            .transport(transport.clone())
            .clock(FixedClock::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            ))
            .build()
            .unwrap();
        TaskOrchestrator::new(Arc::new(client))
    }

    fn ok(body: Value) -> RawResponse {
        RawResponse::new(200, body.to_string())
    }

    fn task_list(arn: &str, status: &str) -> RawResponse {
        ok(json!({ "tasks": [{ "taskArn": arn, "lastStatus": status }], "failures": [] }))
    }

    fn sent_body(transport: &ScriptedTransport, index: usize) -> Value {
        transport.requests()[index].json().unwrap()
    }

    #[tokio::test]
    async fn run_defaults_to_single_on_demand_strategy() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "PROVISIONING"));
        let handle = orchestrator(&transport)
            .run(&descriptor(), None, RunOptions::new())
            .await
            .unwrap();

        assert_eq!(handle.arn(), TASK_ARN);
        assert_eq!(handle.status(), "PROVISIONING");
        assert_eq!(handle.phase(), LifecyclePhase::Pending);

        let request = &transport.requests()[0];
        assert_eq!(
            request.header("x-amz-target"),
            Some("AmazonEC2ContainerServiceV20141113.RunTask")
        );
        let body = sent_body(&transport, 0);
        assert_eq!(
            body["capacityProviderStrategy"],
            json!([{ "capacityProvider": "FARGATE", "weight": 1 }])
        );
        assert_eq!(body["cluster"], CLUSTER);
        assert_eq!(
            body["taskDefinition"],
            "arn:aws:ecs:us-east-1:123456789012:task-definition/app:3"
        );
        assert_eq!(
            body["networkConfiguration"],
            json!({
                "awsvpcConfiguration": {
                    "subnets": ["subnet-1", "subnet-2"],
                    "securityGroups": ["sg-1"],
                    "assignPublicIp": "DISABLED"
                }
            })
        );
        assert!(body.get("count").is_none());
    }

    #[tokio::test]
    async fn run_on_spot_capacity() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "PENDING"));
        orchestrator(&transport)
            .run(
                &descriptor(),
                None,
                RunOptions::new().capacity(CapacityStrategy::Spot),
            )
            .await
            .unwrap();

        assert_eq!(
            sent_body(&transport, 0)["capacityProviderStrategy"],
            json!([{ "capacityProvider": "FARGATE_SPOT", "weight": 1 }])
        );
    }

    #[tokio::test]
    async fn run_applies_overrides_only_to_named_container() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "PENDING"));
        let mut overrides = EnvironmentOverrides::new();
        overrides.insert(
            "app".into(),
            BTreeMap::from([("FOO".to_string(), "bar".to_string())]),
        );
        overrides.insert(
            "not-in-descriptor".into(),
            BTreeMap::from([("X".to_string(), "y".to_string())]),
        );

        orchestrator(&transport)
            .run(&descriptor(), Some(&overrides), RunOptions::new())
            .await
            .unwrap();

        assert_eq!(
            sent_body(&transport, 0)["overrides"]["containerOverrides"],
            json!([
                { "name": "app", "environment": [{ "name": "FOO", "value": "bar" }] },
                { "name": "sidecar", "environment": [] }
            ])
        );
    }

    #[tokio::test]
    async fn run_environment_is_ordered_by_variable_name() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "PENDING"));
        let mut overrides = EnvironmentOverrides::new();
        overrides.insert(
            "sidecar".into(),
            BTreeMap::from([
                ("ZED".to_string(), "1".to_string()),
                ("ALPHA".to_string(), "2".to_string()),
            ]),
        );

        orchestrator(&transport)
            .run(&descriptor(), Some(&overrides), RunOptions::new())
            .await
            .unwrap();

        let body = sent_body(&transport, 0);
        assert_eq!(
            body["overrides"]["containerOverrides"][1]["environment"],
            json!([{ "name": "ALPHA", "value": "2" }, { "name": "ZED", "value": "1" }])
        );
        assert_eq!(body["overrides"]["containerOverrides"][0]["environment"], json!([]));
    }

    #[tokio::test]
    async fn run_with_empty_task_list_is_a_run_error() {
        let raw = ok(json!({
            "tasks": [],
            "failures": [{ "arn": "arn:aws:ecs:us-east-1:1:container-instance/x", "reason": "RESOURCE:MEMORY" }]
        }));
        let transport = ScriptedTransport::new().respond(raw.clone());
        let err = orchestrator(&transport)
            .run(&descriptor(), None, RunOptions::new())
            .await
            .unwrap_err();

        let TaskError::Run(FailureCause::Empty { failures, raw: kept }) = &err else {
            panic!("expected semantic run failure, got {err:?}");
        };
        assert_eq!(failures[0].reason.as_deref(), Some("RESOURCE:MEMORY"));
        assert_eq!(kept, &raw);
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }

    #[tokio::test]
    async fn describe_with_empty_task_list_is_a_describe_error() {
        let transport = ScriptedTransport::new().respond(ok(json!({ "tasks": [] })));
        let err = orchestrator(&transport)
            .describe(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Describe(FailureCause::Empty { .. })));
        assert_eq!(err.raw_response().map(|r| r.status), Some(200));
    }

    #[tokio::test]
    async fn missing_tasks_collection_is_a_semantic_failure() {
        let transport = ScriptedTransport::new().respond(ok(json!({})));
        let err = orchestrator(&transport)
            .run(&descriptor(), None, RunOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Run(FailureCause::Empty { .. })));
    }

    #[tokio::test]
    async fn entry_without_status_never_becomes_a_handle() {
        let transport =
            ScriptedTransport::new().respond(ok(json!({ "tasks": [{ "taskArn": TASK_ARN }] })));
        let err = orchestrator(&transport)
            .run(&descriptor(), None, RunOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Run(FailureCause::Empty { .. })));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed() {
        let transport = ScriptedTransport::new().respond(RawResponse::new(200, "<html>"));
        let err = orchestrator(&transport)
            .stop(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            TaskError::Stop(FailureCause::Malformed { raw, .. }) if raw.text() == "<html>"
        ));
    }

    #[tokio::test]
    async fn server_error_surfaces_as_transport_error_without_retry() {
        let d = descriptor();

        let transport = ScriptedTransport::new().always(RawResponse::new(500, "internal"));
        let err = orchestrator(&transport)
            .run(&d, None, RunOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Run(_)));
        assert_eq!(err.transport_status(), Some(500));
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(transport.call_count(), 1);

        let transport = ScriptedTransport::new().always(RawResponse::new(500, "internal"));
        let err = orchestrator(&transport)
            .describe(&d, TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Describe(_)));
        assert_eq!(err.transport_status(), Some(500));
        assert_eq!(transport.call_count(), 1);

        let transport = ScriptedTransport::new().always(RawResponse::new(500, "internal"));
        let err = orchestrator(&transport)
            .stop(&d, TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Stop(_)));
        assert_eq!(err.transport_status(), Some(500));
        assert_eq!(err.raw_response().map(|r| r.text().into_owned()), Some("internal".into()));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn client_errors_are_permanent_for_bad_parameters() {
        let transport = ScriptedTransport::new().respond(RawResponse::new(
            400,
            r#"{"__type":"com.amazonaws.ecs#ClusterNotFoundException","message":"Cluster not found."}"#,
        ));
        let err = orchestrator(&transport)
            .run(&descriptor(), None, RunOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.transport_status(), Some(400));
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }

    #[tokio::test]
    async fn describe_unknown_id_is_an_error_not_a_partial_handle() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "RUNNING"));
        let err = orchestrator(&transport)
            .describe(&descriptor(), "unknown-id", CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Describe(FailureCause::Empty { .. })));
    }

    #[tokio::test]
    async fn describe_accepts_short_task_id() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "RUNNING"));
        let handle = orchestrator(&transport)
            .describe(&descriptor(), "0123abcd", CallOptions::new())
            .await
            .unwrap();
        assert_eq!(handle.arn(), TASK_ARN);
        assert_eq!(handle.task_id(), "0123abcd");
    }

    #[tokio::test]
    async fn describe_reports_aged_out_task_as_missing() {
        let transport = ScriptedTransport::new().respond(ok(json!({
            "tasks": [],
            "failures": [{ "arn": TASK_ARN, "reason": "MISSING" }]
        })));
        let err = orchestrator(&transport)
            .describe(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_missing());
    }

    #[tokio::test]
    async fn stop_reports_acceptance_status_verbatim() {
        let transport = ScriptedTransport::new().respond(ok(json!({
            "task": { "taskArn": TASK_ARN, "lastStatus": "RUNNING", "desiredStatus": "STOPPED" }
        })));
        let handle = orchestrator(&transport)
            .stop(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap();

        assert_eq!(handle.status(), "RUNNING");
        assert_ne!(handle.status(), "STOPPED");
        assert_eq!(handle.phase(), LifecyclePhase::Running);

        let request = &transport.requests()[0];
        assert_eq!(
            request.header("x-amz-target"),
            Some("AmazonEC2ContainerServiceV20141113.StopTask")
        );
        assert_eq!(
            sent_body(&transport, 0),
            json!({ "cluster": CLUSTER, "task": TASK_ARN })
        );
    }

    #[tokio::test]
    async fn stop_while_draining_is_not_reported_as_terminated() {
        let transport = ScriptedTransport::new().respond(ok(json!({
            "task": { "taskArn": TASK_ARN, "lastStatus": "DEACTIVATING", "desiredStatus": "STOPPED" }
        })));
        let handle = orchestrator(&transport)
            .stop(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap();

        assert_eq!(handle.status(), "DEACTIVATING");
        assert_eq!(handle.phase(), LifecyclePhase::Stopping);
        assert_ne!(handle.phase(), LifecyclePhase::Stopped);
    }

    #[tokio::test]
    async fn stop_without_task_is_a_stop_error() {
        let transport = ScriptedTransport::new().respond(ok(json!({})));
        let err = orchestrator(&transport)
            .stop(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Stop(FailureCause::Empty { .. })));
    }

    #[tokio::test]
    async fn describe_targets_the_cluster_the_task_was_run_in() {
        let transport = ScriptedTransport::new()
            .respond(task_list(TASK_ARN, "PENDING"))
            .respond(task_list(TASK_ARN, "RUNNING"));
        let orchestrator = orchestrator(&transport);
        let d = descriptor();

        let launched = orchestrator.run(&d, None, RunOptions::new()).await.unwrap();
        let described = orchestrator
            .describe(&d, launched.arn(), CallOptions::new())
            .await
            .unwrap();

        let describe_body = sent_body(&transport, 1);
        assert_eq!(describe_body, json!({ "cluster": d.cluster(), "tasks": [launched.arn()] }));
        assert_eq!(sent_body(&transport, 0)["cluster"], describe_body["cluster"]);
        assert_eq!(described.status(), "RUNNING");
        // snapshots are independent
        assert_eq!(launched.status(), "PENDING");
    }

    #[tokio::test]
    async fn concurrent_calls_share_one_client() {
        let transport = ScriptedTransport::new().always(task_list(TASK_ARN, "RUNNING"));
        let orchestrator = orchestrator(&transport);
        let d = descriptor();

        let (a, b, c) = tokio::join!(
            orchestrator.describe(&d, TASK_ARN, CallOptions::new()),
            orchestrator.describe(&d, TASK_ARN, CallOptions::new()),
            orchestrator.describe(&d, "0123abcd", CallOptions::new()),
        );
        assert_eq!(a.unwrap().arn(), TASK_ARN);
        assert_eq!(b.unwrap().arn(), TASK_ARN);
        assert_eq!(c.unwrap().arn(), TASK_ARN);
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn trait_object_can_stand_in_for_the_orchestrator() {
        let transport = ScriptedTransport::new().respond(task_list(TASK_ARN, "RUNNING"));
        let api: Arc<dyn TaskApi> = Arc::new(orchestrator(&transport));
        let handle = api
            .describe(&descriptor(), TASK_ARN, CallOptions::new())
            .await
            .unwrap();
        assert_eq!(handle.status(), "RUNNING");
    }
}
