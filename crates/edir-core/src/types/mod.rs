//! Core types for edir-provision

mod entry;
mod outcome;
mod session;

pub use entry::*;
pub use outcome::*;
pub use session::*;
