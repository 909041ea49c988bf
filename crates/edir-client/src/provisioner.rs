//! Batch provisioning
//!
//! Drives a [`SessionClient`] through one run: open the session, fetch the
//! token, create every entry of every batch in order, close the session.
//! Individual entry failures are recorded and never stop the run; failures
//! of the session steps are fatal.

use std::fs;
use std::io;
use std::path::PathBuf;

use edir_core::{
    CategoryLog, Credentials, EntryKind, EntryParser, Journal, ParseReport, ProvisioningOutcome,
    RejectedBlock, Tone,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::client::SessionClient;
use crate::error::ClientError;
use crate::session::Session;

/// Where a batch's raw entry text comes from
pub trait EntrySource {
    fn read(&self) -> io::Result<String>;

    /// Human-readable origin for log lines
    fn describe(&self) -> String;
}

/// Entry text read from a file when the batch starts
#[derive(Debug, Clone)]
pub struct FileSource(pub PathBuf);

impl EntrySource for FileSource {
    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.0)
    }

    fn describe(&self) -> String {
        self.0.display().to_string()
    }
}

/// Entry text already in memory
#[derive(Debug, Clone)]
pub struct TextSource(pub String);

impl EntrySource for TextSource {
    fn read(&self) -> io::Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "inline text".to_string()
    }
}

/// One ordered collection of entries of a single kind
pub struct Batch {
    pub kind: EntryKind,
    pub source: Box<dyn EntrySource>,
}

impl Batch {
    pub fn new(kind: EntryKind, source: impl EntrySource + 'static) -> Self {
        Self {
            kind,
            source: Box::new(source),
        }
    }

    pub fn from_file(kind: EntryKind, path: impl Into<PathBuf>) -> Self {
        Self::new(kind, FileSource(path.into()))
    }
}

/// What happened to one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub kind: EntryKind,
    /// Valid entries found in the input
    pub found: usize,
    pub rejected: Vec<RejectedBlock>,
    pub outcomes: Vec<ProvisioningOutcome>,
    /// Set when the source could not be read
    pub read_error: Option<String>,
}

impl BatchReport {
    fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            found: 0,
            rejected: Vec::new(),
            outcomes: Vec::new(),
            read_error: None,
        }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

/// Per-batch results of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub batches: Vec<BatchReport>,
}

impl RunReport {
    pub fn attempted(&self) -> usize {
        self.batches.iter().map(BatchReport::attempted).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.batches.iter().map(BatchReport::succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches.iter().map(BatchReport::failed).sum()
    }
}

/// Fatal run failures
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Session or token could not be obtained; no entry was attempted
    #[error("Failed to create eDirectory session and token: {0}")]
    Startup(#[source] ClientError),

    /// All batches ran but the session could not be deleted
    #[error("Failed to delete eDirectory API session: {source}")]
    Teardown {
        #[source]
        source: ClientError,
        report: Box<RunReport>,
    },
}

/// Orchestrates the entry parser and session client over a list of batches
pub struct BatchProvisioner<'a> {
    client: &'a SessionClient,
    journal: &'a Journal,
}

impl<'a> BatchProvisioner<'a> {
    pub fn new(client: &'a SessionClient, journal: &'a Journal) -> Self {
        Self { client, journal }
    }

    pub async fn run(
        &self,
        credentials: &Credentials,
        batches: Vec<Batch>,
    ) -> Result<RunReport, ProvisionError> {
        let journal = self.journal;

        journal.say(
            Tone::Notice,
            "Proceeding to create a Session and a Token for eDirectory API",
        );

        journal.session_open().info("Creating eDirectory API session");
        let session_id = match self.client.open_session(credentials).await {
            Ok(id) => id,
            Err(e) => {
                report_startup_failure(journal.session_open(), &e);
                return Err(ProvisionError::Startup(e));
            }
        };
        journal
            .session_open()
            .success("eDirectory API Session created successfully!");

        journal.token().info("Requesting Anti-CSRF token");
        let session = match self.client.acquire_token(session_id).await {
            Ok(session) => session,
            Err(e) => {
                report_startup_failure(journal.token(), &e);
                return Err(ProvisionError::Startup(e));
            }
        };
        journal
            .token()
            .success("eDirectory API Anti-CSRF token retrieved successfully!");

        let mut report = RunReport::default();
        for batch in batches {
            let batch_report = self.provision_batch(&session, batch).await;
            report.batches.push(batch_report);
        }

        journal.say(
            Tone::Notice,
            "Proceeding to delete the session from eDirectory API...",
        );
        journal.session_close().info("Deleting eDirectory API session");
        match self.client.close_session(session).await {
            Ok(()) => {
                journal
                    .session_close()
                    .success("eDirectory API session deleted successfully!");
                Ok(report)
            }
            Err(e) => {
                let log = journal.session_close();
                log.failure("Failed to delete eDirectory API session");
                log.failure(e.to_string());
                if let Some(body) = e.body() {
                    log.failure(format!("Result from the query: {}", body));
                }
                Err(ProvisionError::Teardown {
                    source: e,
                    report: Box::new(report),
                })
            }
        }
    }

    async fn provision_batch(&self, session: &Session, batch: Batch) -> BatchReport {
        let kind = batch.kind;
        let mut batch_report = BatchReport::new(kind);

        self.journal.say(
            Tone::Notice,
            format!("Proceeding to create the LDAP {}...", capitalize(kind.plural())),
        );

        let Some(parsed) = load_batch(self.journal, &batch, &mut batch_report) else {
            return batch_report;
        };

        let log = self.journal.for_kind(kind);
        let total = parsed.entries.len();
        for (idx, entry) in parsed.entries.into_iter().enumerate() {
            let cn = entry.common_name().to_string();
            log.notice(format!(
                "[{}/{}] Creating {}: {}",
                idx + 1,
                total,
                kind,
                cn
            ));

            let outcome = self.client.create_entry(session, entry).await;
            self.report_outcome(kind, &cn, &outcome);
            batch_report.outcomes.push(outcome);
        }

        batch_report
    }

    fn report_outcome(&self, kind: EntryKind, cn: &str, outcome: &ProvisioningOutcome) {
        let log = self.journal.for_kind(kind);

        if outcome.succeeded {
            if let Some(body) = &outcome.response_body {
                log.info(format!("Result from the {} query: {}", kind, body));
            }
            log.success(format!("{} {} was created successfully!", kind.label(), cn));
            return;
        }

        match outcome.status_code {
            Some(status) => {
                log.failure(format!(
                    "The status code from the request of eDirectory API ldap {} creation is: {}",
                    kind, status
                ));
                if let Some(detail) = &outcome.error_detail {
                    log.failure(format!("Result from the {} query: {}", kind, detail));
                }
                log.failure(format!("Failed to create the {} {}", kind, cn));
            }
            None => {
                log.failure(format!("Request error for {} {}", kind, cn));
                if let Some(detail) = &outcome.error_detail {
                    log.failure(detail);
                }
            }
        }
    }
}

/// Parse every batch and report what a run would create, without
/// contacting the API.
pub fn plan(journal: &Journal, batches: Vec<Batch>) -> RunReport {
    let mut report = RunReport::default();
    for batch in batches {
        let mut batch_report = BatchReport::new(batch.kind);
        if let Some(parsed) = load_batch(journal, &batch, &mut batch_report) {
            let log = journal.for_kind(batch.kind);
            for (idx, entry) in parsed.entries.iter().enumerate() {
                log.info(format!(
                    "[{}/{}] Would create {}: {} ({})",
                    idx + 1,
                    parsed.entries.len(),
                    batch.kind,
                    entry.common_name(),
                    entry.dn()
                ));
            }
        }
        report.batches.push(batch_report);
    }
    report
}

/// Read and parse a batch, logging found/rejected counts. Returns `None`
/// when the source cannot be read.
fn load_batch(
    journal: &Journal,
    batch: &Batch,
    batch_report: &mut BatchReport,
) -> Option<ParseReport> {
    let log = journal.for_kind(batch.kind);
    let source = batch.source.describe();
    debug!(kind = %batch.kind, source = %source, "Reading batch");

    let raw = match batch.source.read() {
        Ok(raw) => raw,
        Err(e) => {
            let message = format!("Failed to read {} input {}: {}", batch.kind, source, e);
            log.failure(&message);
            batch_report.read_error = Some(message);
            return None;
        }
    };

    let parsed = EntryParser::new(batch.kind).parse(&raw);
    for rejected in &parsed.rejected {
        log.warn(format!(
            "Skipping invalid entry (missing dn or objectClass): block {} ({}): {}",
            rejected.block_number, rejected.reason, rejected.preview
        ));
    }

    batch_report.found = parsed.entries.len();
    batch_report.rejected = parsed.rejected.clone();
    log.detail(format!(
        "Found {} {} to create in the input file",
        parsed.entries.len(),
        batch.kind.plural()
    ));

    Some(parsed)
}

fn report_startup_failure(log: &CategoryLog, err: &ClientError) {
    log.failure("Failed to create eDirectory session and token");
    log.failure(err.to_string());
    if let Some(body) = err.body() {
        log.failure(format!("Result from the query: {}", body));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
