//! Per-entry provisioning results

use super::DirectoryEntry;
use serde::Serialize;

/// Result of one entry creation attempt
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningOutcome {
    pub entry: DirectoryEntry,
    pub succeeded: bool,
    /// HTTP status, absent when the request never got a response
    pub status_code: Option<u16>,
    /// Response body or transport error for failed attempts
    pub error_detail: Option<String>,
    /// Response body returned alongside a successful creation
    pub response_body: Option<String>,
}

impl ProvisioningOutcome {
    pub fn created(entry: DirectoryEntry, status: u16, body: Option<String>) -> Self {
        Self {
            entry,
            succeeded: true,
            status_code: Some(status),
            error_detail: None,
            response_body: body,
        }
    }

    pub fn rejected(entry: DirectoryEntry, status: u16, body: String) -> Self {
        Self {
            entry,
            succeeded: false,
            status_code: Some(status),
            error_detail: Some(body),
            response_body: None,
        }
    }

    pub fn transport_failure(entry: DirectoryEntry, message: impl Into<String>) -> Self {
        Self {
            entry,
            succeeded: false,
            status_code: None,
            error_detail: Some(message.into()),
            response_body: None,
        }
    }
}
