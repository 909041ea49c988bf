//! Configuration for edir-provision
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The CLI applies its own flags last.
//!
//! Example config:
//! ```toml
//! [api]
//! url = "https://edir.example.com/eDirAPI/v1"
//! origin = "https://edir.example.com"
//! tree = "CORP-TREE"
//! organization = "o=Org"
//! ldap_server = "10.0.0.5"
//!
//! [credentials]
//! admin_dn = "cn=admin,o=Org"
//! admin_password = "changeit"
//!
//! [input]
//! users_file = "input/users.txt"
//! groups_file = "input/groups.txt"
//!
//! [logging]
//! directory = "logs"
//! ```

use crate::error::{CoreError, Result};
use crate::types::Credentials;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "EDIR_LDAP_API_URL";
pub const ENV_ORIGIN: &str = "EDIR_LDAP_ORIGIN";
pub const ENV_ADMIN_DN: &str = "EDIR_LDAP_ADMIN_DN";
pub const ENV_ADMIN_PASSWORD: &str = "EDIR_LDAP_ADMIN_PASSWORD";
pub const ENV_ORGANIZATION: &str = "EDIR_LDAP_ORG";
pub const ENV_TREE: &str = "EDIR_LDAP_TREE";
pub const ENV_LDAP_SERVER: &str = "EDIR_LDAP_SERVER";
pub const ENV_VERIFY_TLS: &str = "EDIR_LDAP_VERIFY_TLS";
pub const ENV_LOGS_DIRECTORY: &str = "OUTPUT_EDIR_LDAP_LOGS_DIRECTORY";
pub const ENV_USERS_FILE: &str = "INPUT_EDIR_LDAP_USERS_FILE_PATH";
pub const ENV_GROUPS_FILE: &str = "INPUT_EDIR_LDAP_GROUPS_FILE_PATH";
pub const ENV_LOG_LEVEL: &str = "EDIR_LOG_LEVEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProvisionConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.url = Some(url);
        }
        if let Some(origin) = get(ENV_ORIGIN) {
            self.api.origin = Some(origin);
        }
        if let Some(tree) = get(ENV_TREE) {
            self.api.tree = Some(tree);
        }
        if let Some(org) = get(ENV_ORGANIZATION) {
            self.api.organization = Some(org);
        }
        if let Some(server) = get(ENV_LDAP_SERVER) {
            self.api.ldap_server = Some(server);
        }
        if let Some(verify) = get(ENV_VERIFY_TLS) {
            self.api.verify_tls = matches!(verify.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(dn) = get(ENV_ADMIN_DN) {
            self.credentials.admin_dn = Some(dn);
        }
        if let Some(password) = get(ENV_ADMIN_PASSWORD) {
            self.credentials.admin_password = Some(password);
        }
        if let Some(dir) = get(ENV_LOGS_DIRECTORY) {
            self.logging.directory = PathBuf::from(dir);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(users) = get(ENV_USERS_FILE) {
            self.input.users_file = Some(PathBuf::from(users));
        }
        if let Some(groups) = get(ENV_GROUPS_FILE) {
            self.input.groups_file = Some(PathBuf::from(groups));
        }
    }

    /// Check every field a provisioning run needs, reporting all gaps at once
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        if self.api.url.is_none() {
            missing.push("api.url");
        }
        if self.api.tree.is_none() {
            missing.push("api.tree");
        }
        if self.api.organization.is_none() {
            missing.push("api.organization");
        }
        if self.api.ldap_server.is_none() {
            missing.push("api.ldap_server");
        }
        if self.credentials.admin_dn.is_none() {
            missing.push("credentials.admin_dn");
        }
        if self.credentials.admin_password.is_none() {
            missing.push("credentials.admin_password");
        }
        if self.input.users_file.is_none() && self.input.groups_file.is_none() {
            missing.push("input.users_file or input.groups_file");
        }

        if !missing.is_empty() {
            return Err(CoreError::MissingConfig(missing));
        }

        self.api.validate()
    }

    /// Credentials for the session endpoint, if fully configured
    pub fn credentials(&self) -> Result<Credentials> {
        match (
            &self.credentials.admin_dn,
            &self.credentials.admin_password,
            &self.api.ldap_server,
        ) {
            (Some(dn), Some(password), Some(server)) => Ok(Credentials {
                dn: dn.clone(),
                password: password.clone(),
                ldap_server: server.clone(),
            }),
            _ => Err(CoreError::MissingConfig(vec![
                "credentials.admin_dn",
                "credentials.admin_password",
                "api.ldap_server",
            ])),
        }
    }

    /// Printable key/value listing with the password masked
    pub fn display_pairs(&self) -> Vec<(&'static str, String)> {
        fn show<T: fmt::Display>(value: Option<T>) -> String {
            value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "(not set)".to_string())
        }

        vec![
            ("api.url", show(self.api.url.as_deref())),
            ("api.origin", show(self.api.origin.as_deref())),
            ("api.tree", show(self.api.tree.as_deref())),
            ("api.organization", show(self.api.organization.as_deref())),
            ("api.ldap_server", show(self.api.ldap_server.as_deref())),
            ("api.verify_tls", self.api.verify_tls.to_string()),
            ("api.timeout_secs", show(self.api.timeout_secs)),
            ("credentials.admin_dn", show(self.credentials.admin_dn.as_deref())),
            (
                "credentials.admin_password",
                show(self.credentials.admin_password.as_ref().map(|_| "***")),
            ),
            (
                "input.users_file",
                show(self.input.users_file.as_ref().map(|p| p.display())),
            ),
            (
                "input.groups_file",
                show(self.input.groups_file.as_ref().map(|p| p.display())),
            ),
            ("logging.directory", self.logging.directory.display().to_string()),
            ("logging.level", self.logging.level.clone()),
        ]
    }
}

/// eDirectory REST API endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://host/eDirAPI/v1`
    pub url: Option<String>,
    /// Value of the `Origin` header sent with every request
    pub origin: Option<String>,
    /// Directory tree name used in tree-scoped paths
    pub tree: Option<String>,
    /// Container that new entries are created under
    pub organization: Option<String>,
    /// LDAP server the API session binds against
    pub ldap_server: Option<String>,
    /// Verify the server certificate (off by default)
    #[serde(default)]
    pub verify_tls: bool,
    /// Request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::InvalidConfig(format!(
                    "api.url must start with http:// or https://: {}",
                    url
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(CoreError::InvalidConfig(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub admin_dn: Option<String>,
    pub admin_password: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("admin_dn", &self.admin_dn)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Entry files for each batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub users_file: Option<PathBuf>,
    pub groups_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding one log file per operation category
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
    /// Diagnostic level for stderr tracing output
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: default_log_level(),
        }
    }
}
