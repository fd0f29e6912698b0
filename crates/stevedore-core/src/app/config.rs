//! ClientConfig - region と endpoint の解決
//!
//! # region の優先順位
//! 1. CallOptions.region（呼び出しごとの明示指定）
//! 2. ClientConfig.region（環境などから解決済みのもの）
//! 3. どちらもなければ ClientError::MissingRegion

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::domain::ClientError;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://ecs.{region}.amazonaws.com/";
pub const REGION_PLACEHOLDER: &str = "{region}";

pub const REGION_VAR: &str = "AWS_REGION";
pub const DEFAULT_REGION_VAR: &str = "AWS_DEFAULT_REGION";
pub const ENDPOINT_VAR: &str = "AWS_ENDPOINT_URL_ECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ambient region, used when a call does not name one.
    pub region: Option<String>,
    /// Endpoint URL with a `{region}` placeholder.
    pub endpoint_template: String,
    /// Literal endpoint URL (local emulators, VPC endpoints). Wins over the template.
    pub endpoint_override: Option<String>,
    /// Default deadline for one round trip.
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            endpoint_override: None,
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like `from_env`, resolving variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            region: non_empty(REGION_VAR).or_else(|| non_empty(DEFAULT_REGION_VAR)),
            endpoint_override: non_empty(ENDPOINT_VAR),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_override(mut self, url: impl Into<String>) -> Self {
        self.endpoint_override = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Resolve the endpoint for one call.
    pub fn resolve_endpoint(&self, call_region: Option<&str>) -> Result<Endpoint, ClientError> {
        let region = call_region
            .or(self.region.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(ClientError::MissingRegion)?;

        if !region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ClientError::InvalidEndpoint {
                url: self.endpoint_template.clone(),
                reason: format!("region {region:?} contains invalid characters"),
            });
        }

        let raw = match &self.endpoint_override {
            Some(url) => url.clone(),
            None => self.endpoint_template.replace(REGION_PLACEHOLDER, region),
        };
        Endpoint::parse(&raw, region)
    }
}

/// A resolved, region-scoped endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    region: String,
}

impl Endpoint {
    pub fn parse(raw: &str, region: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if url.query().is_some() {
            return Err(invalid("query strings are not supported".to_string()));
        }
        // the signer uses the path verbatim as the canonical URI
        if let Some(c) = url
            .path()
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '.' | '_' | '~')))
        {
            return Err(invalid(format!(
                "path character {c:?} would need canonical re-encoding"
            )));
        }
        Ok(Self {
            url,
            region: region.to_string(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Host as it appears in the `host` header (port only when non-default).
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            path => path,
        }
    }
}
