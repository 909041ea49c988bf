//! Directory entry types

use crate::error::EntryError;
use crate::{OBJECT_CLASS, UNKNOWN_CN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    User,
    Group,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }

    /// Capitalized label for console lines ("User alice was created")
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user or group ready to be submitted to the directory.
///
/// Serializes to the request body expected by the entry creation endpoint:
/// `{"dn": "...", "attributes": {"objectClass": [...], ...}}`. The kind is
/// local bookkeeping and never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    #[serde(skip)]
    kind: EntryKind,
    dn: String,
    attributes: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Build an entry, enforcing a non-empty dn and at least one objectClass
    pub fn new(
        kind: EntryKind,
        dn: impl Into<String>,
        attributes: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, EntryError> {
        let dn = dn.into();
        if dn.trim().is_empty() {
            return Err(EntryError::EmptyDn);
        }

        let has_object_class = attributes
            .get(OBJECT_CLASS)
            .map_or(false, |values| !values.is_empty());
        if !has_object_class {
            return Err(EntryError::MissingObjectClass(dn));
        }

        Ok(Self {
            kind,
            dn,
            attributes,
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn attributes(&self) -> &BTreeMap<String, Vec<String>> {
        &self.attributes
    }

    /// All values of an attribute in the order they were read
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn object_classes(&self) -> &[String] {
        self.values(OBJECT_CLASS)
    }

    /// First `cn` value, or `<unknown>` when the entry has none
    pub fn common_name(&self) -> &str {
        self.values("cn")
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CN)
    }
}
