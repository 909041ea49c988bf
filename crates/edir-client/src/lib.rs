//! eDirectory REST API client
//!
//! [`SessionClient`] speaks the session protocol (authenticate, fetch the
//! anti-CSRF token, create entries, delete the session) and
//! [`BatchProvisioner`] runs parsed user and group batches through it.

pub mod client;
pub mod error;
pub mod provisioner;
pub mod session;

pub use client::SessionClient;
pub use error::{ClientError, ClientResult, Operation};
pub use provisioner::{
    plan, Batch, BatchProvisioner, BatchReport, EntrySource, FileSource, ProvisionError,
    RunReport, TextSource,
};
pub use session::Session;
