//! RequestSigner - action + JSON body を署名済み HTTP リクエストに変換
//!
//! # 署名の 4 段階
//! 1. 日付スコープでの鍵導出（date → region → service → aws4_request）
//! 2. canonical request
//! 3. string-to-sign
//! 4. HMAC チェーンで signature を計算
//!
//! 時刻は引数で受け取ります。signer 自身はシステム時計を読みません。

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::config::Endpoint;
use crate::domain::{Action, AuthError};
use crate::ports::{CredentialProvider, HttpRequest};

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "ecs";
pub const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
}

impl RequestSigner {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Build the authenticated request for `action`.
    ///
    /// Fails with `AuthError` when `credentials` cannot produce a usable key pair.
    pub fn sign(
        &self,
        endpoint: &Endpoint,
        credentials: &dyn CredentialProvider,
        action: Action,
        body: Vec<u8>,
        at: DateTime<Utc>,
    ) -> Result<HttpRequest, AuthError> {
        let credentials = credentials.credentials()?;
        credentials.validate()?;

        let amz_date = at.format("%Y%m%dT%H%M%SZ").to_string();
        let date = at.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{}/aws4_request", endpoint.region(), self.service);

        // sorted by name
        let mut headers = vec![
            ("content-type".to_string(), CONTENT_TYPE.to_string()),
            ("host".to_string(), endpoint.host()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &credentials.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers.push(("x-amz-target".to_string(), action.target()));

        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical = canonical_request(endpoint.path(), &headers, &signed_headers, &body);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical.as_bytes()))
        );

        let key = signing_key(
            &credentials.secret_access_key,
            &date,
            endpoint.region(),
            &self.service,
        )?;
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

        headers.push((
            "authorization".to_string(),
            format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                credentials.access_key_id
            ),
        ));

        Ok(HttpRequest {
            method: "POST",
            url: endpoint.url().to_string(),
            headers,
            body,
        })
    }
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(SERVICE)
    }
}

fn canonical_request(
    path: &str,
    headers: &[(String, String)],
    signed_headers: &str,
    body: &[u8],
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();
    format!(
        "POST\n{path}\n\n{canonical_headers}\n{signed_headers}\n{}",
        hex::encode(Sha256::digest(body))
    )
}

/// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, AuthError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| AuthError::InvalidKey)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
