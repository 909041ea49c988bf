//! Client error types

use std::fmt;
use thiserror::Error;

/// Result type for session client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Outbound request performed by the session client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpenSession,
    AcquireToken,
    CreateEntry,
    CloseSession,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OpenSession => "session creation",
            Self::AcquireToken => "anti-CSRF token request",
            Self::CreateEntry => "entry creation",
            Self::CloseSession => "session deletion",
        };
        f.write_str(text)
    }
}

/// Session client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error during {operation}: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("The status code from the {operation} request is: {status}")]
    UnexpectedStatus {
        operation: Operation,
        status: u16,
        body: String,
    },

    #[error("Session created but the response carried no {cookie} cookie")]
    MissingSessionCookie { cookie: &'static str },

    #[error("Token endpoint returned an empty anti-CSRF token")]
    EmptyToken,

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub(crate) fn transport(operation: Operation, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }

    /// HTTP status if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body if the server answered with an unexpected status
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
