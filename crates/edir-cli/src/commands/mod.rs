//! CLI command implementations

pub mod parse;
pub mod run;
pub mod show_config;

use edir_core::ProvisionConfig;

use crate::OutputFormat;

/// Context passed to all commands
pub struct CommandContext {
    pub config: ProvisionConfig,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// The console transcript is off in quiet mode and when stdout carries JSON
    pub fn console(&self) -> bool {
        !self.quiet && !self.is_json()
    }
}
