//! Credential providers.

use crate::domain::AuthError;
use crate::ports::{CredentialProvider, Credentials};

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

/// Credentials handed over by an external resolver.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        self.credentials.validate()?;
        Ok(self.credentials.clone())
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the standard credential variables on every call, so a rotating
/// resolver that rewrites the environment is picked up.
pub struct EnvCredentials {
    lookup: Lookup,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve variables through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, AuthError> {
        let access_key_id = (self.lookup)(ACCESS_KEY_ID_VAR)
            .ok_or_else(|| AuthError::Unresolved(format!("{ACCESS_KEY_ID_VAR} is not set")))?;
        let secret_access_key = (self.lookup)(SECRET_ACCESS_KEY_VAR)
            .ok_or_else(|| AuthError::Unresolved(format!("{SECRET_ACCESS_KEY_VAR} is not set")))?;

        let mut credentials = Credentials::new(access_key_id, secret_access_key);
        if let Some(token) = (self.lookup)(SESSION_TOKEN_VAR).filter(|t| !t.is_empty()) {
            credentials = credentials.with_session_token(token);
        }
        credentials.validate()?;
        Ok(credentials)
    }
}
