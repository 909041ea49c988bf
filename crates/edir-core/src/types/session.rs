//! Session identifier, token and credential types

use serde::Serialize;
use std::fmt;

/// Number of leading characters shown when a secret is printed
const REDACTED_PREFIX: usize = 4;

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(REDACTED_PREFIX).collect();
    format!("{}***", prefix)
}

/// Session identifier issued by the API in the `RSESSIONID` cookie
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&redact(&self.0)).finish()
    }
}

/// One-time anti-CSRF token scoped to an open session
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Build a token from the raw response body: surrounding whitespace and
    /// JSON string quotes are stripped.
    pub fn from_body(body: &str) -> Self {
        Self(body.trim().trim_matches('"').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CsrfToken").field(&redact(&self.0)).finish()
    }
}

/// Administrator credentials posted to the session endpoint
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub dn: String,
    pub password: String,
    #[serde(rename = "ldapserver")]
    pub ldap_server: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("dn", &self.dn)
            .field("password", &"***")
            .field("ldap_server", &self.ldap_server)
            .finish()
    }
}
