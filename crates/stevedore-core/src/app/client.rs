//! ControlPlaneClient - 署名してコントロールプレーンに送る
//!
//! - region から endpoint を解決し、RequestSigner で署名し、POST する
//! - non-2xx は ClientError::Transport（raw response 付き）
//! - JSON の中身は解釈しない（orchestrator の責務）
//! - リトライしない。RunTask の再送はタスクの二重配置になりうる

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::builder::ControlPlaneClientBuilder;
use super::config::ClientConfig;
use super::signer::RequestSigner;
use crate::domain::{Action, CallOptions, ClientError, RawResponse};
use crate::ports::{Clock, CredentialProvider, HttpRequest, HttpTransport};

/// Constructed once and shared by reference (`Arc`) with every orchestrator.
/// Holds no mutable state, so concurrent calls need no coordination.
pub struct ControlPlaneClient {
    config: ClientConfig,
    signer: RequestSigner,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
}

impl ControlPlaneClient {
    pub fn builder() -> ControlPlaneClientBuilder {
        ControlPlaneClientBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ClientConfig,
        signer: RequestSigner,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            signer,
            credentials,
            transport,
            clock,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// One signed round trip. The transport is called exactly once.
    #[tracing::instrument(name = "control_plane.invoke", skip_all, fields(action = %action))]
    pub async fn invoke(
        &self,
        action: Action,
        body: Vec<u8>,
        options: &CallOptions,
    ) -> Result<RawResponse, ClientError> {
        let endpoint = self.config.resolve_endpoint(options.region.as_deref())?;
        let request = self.signer.sign(
            &endpoint,
            self.credentials.as_ref(),
            action,
            body,
            self.clock.now(),
        )?;

        debug!(region = endpoint.region(), url = %request.url, "sending request");
        let raw = self.dispatch(request, options).await?;

        if !raw.is_success() {
            warn!(
                status = raw.status,
                request_id = ?raw.request_id,
                error_code = ?raw.error_code(),
                "control plane rejected request"
            );
            return Err(ClientError::transport(raw));
        }
        debug!(status = raw.status, request_id = ?raw.request_id, "request accepted");
        Ok(raw)
    }

    async fn dispatch(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<RawResponse, ClientError> {
        let timeout = options.timeout.or_else(|| self.config.timeout());
        match &options.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("request cancelled by caller");
                        Err(ClientError::Cancelled)
                    }
                    result = self.send_bounded(request, timeout) => result,
                }
            }
            None => self.send_bounded(request, timeout).await,
        }
    }

    async fn send_bounded(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ClientError> {
        let send = self.transport.send(request);
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| ClientError::TimedOut(limit))?,
            None => send.await,
        };
        result.map_err(|e| ClientError::Network(e.0))
    }
}
