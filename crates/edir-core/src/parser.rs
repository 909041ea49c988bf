//! Entry file parser
//!
//! Input is a flat text format of `key: value` lines, one entry per block,
//! blocks separated by an empty line:
//!
//! ```text
//! dn: cn=alice,ou=users,o=Org
//! objectClass: inetOrgPerson
//! cn: alice
//! mail: alice@example.com
//!
//! dn: cn=devs,ou=groups,o=Org
//! objectClass: groupOfNames
//! member: cn=alice,ou=users,o=Org
//! ```
//!
//! A line holding only whitespace does not end a block. Lines without a colon
//! are ignored. Only the first colon splits a line, so values may contain
//! colons (URLs, timestamps). Repeated keys accumulate into a multi-valued
//! attribute in reading order. A repeated `dn` replaces the earlier one.

use crate::types::{DirectoryEntry, EntryKind};
use crate::OBJECT_CLASS;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const DN_KEY: &str = "dn";

/// Why a block was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    MissingDn,
    MissingObjectClass,
    MissingBoth,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingDn => "missing dn",
            Self::MissingObjectClass => "missing objectClass",
            Self::MissingBoth => "missing dn and objectClass",
        };
        f.write_str(text)
    }
}

/// A block that could not become an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedBlock {
    /// 1-based position among the non-empty blocks of the input
    pub block_number: usize,
    pub reason: RejectReason,
    /// First line of the block, for locating it in the file
    pub preview: String,
}

/// Parsed entries plus the blocks that were dropped
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub entries: Vec<DirectoryEntry>,
    pub rejected: Vec<RejectedBlock>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Converts raw entry text into directory entries of one kind
#[derive(Debug, Clone, Copy)]
pub struct EntryParser {
    kind: EntryKind,
}

impl EntryParser {
    pub fn new(kind: EntryKind) -> Self {
        Self { kind }
    }

    pub fn parse(&self, raw: &str) -> ParseReport {
        let normalized = raw.replace("\r\n", "\n");
        let mut report = ParseReport::default();

        for (idx, block) in split_blocks(&normalized).into_iter().enumerate() {
            match self.parse_block(&block) {
                Ok(entry) => report.entries.push(entry),
                Err(reason) => report.rejected.push(RejectedBlock {
                    block_number: idx + 1,
                    reason,
                    preview: block.first().map(|l| l.to_string()).unwrap_or_default(),
                }),
            }
        }

        report
    }

    fn parse_block(&self, lines: &[&str]) -> Result<DirectoryEntry, RejectReason> {
        let mut dn: Option<String> = None;
        let mut attributes: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for line in lines {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == DN_KEY {
                dn = Some(value.to_string());
            } else {
                attributes
                    .entry(key.to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }

        let dn = dn.filter(|d| !d.is_empty());
        let has_object_class = attributes.contains_key(OBJECT_CLASS);

        match (dn, has_object_class) {
            (None, false) => Err(RejectReason::MissingBoth),
            (None, true) => Err(RejectReason::MissingDn),
            (Some(_), false) => Err(RejectReason::MissingObjectClass),
            (Some(dn), true) => DirectoryEntry::new(self.kind, dn, attributes)
                .map_err(|_| RejectReason::MissingObjectClass),
        }
    }
}

/// Split text into blocks of trimmed lines. Only an empty line ends a block;
/// whitespace-only lines inside a block are dropped.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let line = line.trim();
        if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Parse and keep only the valid entries
pub fn parse_entries(raw: &str, kind: EntryKind) -> Vec<DirectoryEntry> {
    EntryParser::new(kind).parse(raw).entries
}
