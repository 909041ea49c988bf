//! Error types for edir-provision core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a directory entry cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("distinguished name is empty")]
    EmptyDn,

    #[error("entry {0} has no objectClass value")]
    MissingObjectClass(String),
}
