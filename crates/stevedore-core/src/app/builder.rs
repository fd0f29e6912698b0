//! ControlPlaneClientBuilder - client の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 認証情報の provider が無ければ build() で BuildError を返す
//! - endpoint template に `{region}` が無ければ（override 無しの場合）BuildError
//! - transport / clock は省略時に本番用（ReqwestTransport / SystemClock）

use std::sync::Arc;

use super::client::ControlPlaneClient;
use super::config::{ClientConfig, REGION_PLACEHOLDER};
use super::signer::RequestSigner;
use crate::impls::ReqwestTransport;
use crate::ports::{Clock, CredentialProvider, HttpTransport, SystemClock};

/// # 使用例
/// ```ignore
/// let client = ControlPlaneClient::builder()
///     .config(ClientConfig::from_env())
///     .credentials(EnvCredentials::new())
///     .build()?;
/// ```
#[derive(Default)]
pub struct ControlPlaneClientBuilder {
    config: ClientConfig,
    credentials: Option<Arc<dyn CredentialProvider>>,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no credential provider configured")]
    MissingCredentials,

    #[error("endpoint template {0:?} has no {{region}} placeholder")]
    InvalidTemplate(String),
}

impl ControlPlaneClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for setting the ambient region on the config.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    pub fn credentials(self, provider: impl CredentialProvider + 'static) -> Self {
        self.shared_credentials(Arc::new(provider))
    }

    pub fn shared_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn transport(self, transport: impl HttpTransport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn build(self) -> Result<ControlPlaneClient, BuildError> {
        let credentials = self.credentials.ok_or(BuildError::MissingCredentials)?;
        if self.config.endpoint_override.is_none()
            && !self.config.endpoint_template.contains(REGION_PLACEHOLDER)
        {
            return Err(BuildError::InvalidTemplate(self.config.endpoint_template));
        }

        Ok(ControlPlaneClient::from_parts(
            self.config,
            RequestSigner::default(),
            credentials,
            self.transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new()) as Arc<dyn HttpTransport>),
            self.clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
        ))
    }
}
