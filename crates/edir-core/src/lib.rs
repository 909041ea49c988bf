//! edir-provision Core Library
//!
//! Core types, the entry file parser, configuration and the per-category
//! run journal shared by the eDirectory provisioning client and CLI.

pub mod config;
pub mod error;
pub mod journal;
pub mod parser;
pub mod types;

pub use config::ProvisionConfig;
pub use error::{CoreError, EntryError, Result};
pub use journal::{CategoryLog, Journal, Level, LogCategory, Tone};
pub use parser::{parse_entries, EntryParser, ParseReport, RejectReason, RejectedBlock};
pub use types::{
    Credentials, CsrfToken, DirectoryEntry, EntryKind, ProvisioningOutcome, SessionId,
};

/// edir-provision version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the session cookie issued by the eDirectory REST API
pub const SESSION_COOKIE: &str = "RSESSIONID";

/// Header carrying the anti-CSRF token on mutating requests
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Attribute every entry must declare
pub const OBJECT_CLASS: &str = "objectClass";

/// Placeholder used in progress lines for entries without a `cn`
pub const UNKNOWN_CN: &str = "<unknown>";
