//! eDirectory REST API session client
//!
//! One client drives one session through its lifecycle:
//!
//! ```text
//! open_session ──► acquire_token ──► create_entry* ──► close_session
//!   (SessionId)       (Session)        (&Session)        (consumes)
//! ```
//!
//! Each step consumes the proof of the previous one, so the order cannot be
//! violated and a closed session cannot be reused. Failures of the three
//! lifecycle steps are returned as errors; entry creation never fails the
//! caller and instead reports a [`ProvisioningOutcome`].

use std::time::Duration;

use edir_core::config::ApiConfig;
use edir_core::{
    Credentials, CsrfToken, DirectoryEntry, ProvisioningOutcome, SessionId, CSRF_HEADER,
    SESSION_COOKIE,
};
use reqwest::header::{ACCEPT, COOKIE, ORIGIN};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult, Operation};
use crate::session::Session;

/// Session client for the eDirectory REST API
pub struct SessionClient {
    http: Client,
    base_url: String,
    origin: Option<String>,
    tree: String,
    organization: String,
}

impl SessionClient {
    /// Create a client from the API settings.
    ///
    /// Certificate validation is skipped unless `verify_tls` is set; the
    /// eDirectory API is commonly deployed with a self-signed certificate.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let base_url = config
            .base_url()
            .ok_or_else(|| ClientError::InvalidConfig("api.url is not set".into()))?
            .to_string();
        let tree = config
            .tree
            .clone()
            .ok_or_else(|| ClientError::InvalidConfig("api.tree is not set".into()))?;
        let organization = config
            .organization
            .clone()
            .ok_or_else(|| ClientError::InvalidConfig("api.organization is not set".into()))?;

        let mut builder = ClientBuilder::new();
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            origin: config.origin.clone(),
            tree,
            organization,
        })
    }

    pub fn session_url(&self) -> String {
        format!("{}/session", self.base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/{}/getanticsrftoken", self.base_url, self.tree)
    }

    pub fn entries_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.tree, self.organization)
    }

    /// Authenticate and return the session id from the `RSESSIONID` cookie.
    /// Only `201 Created` counts as success.
    pub async fn open_session(&self, credentials: &Credentials) -> ClientResult<SessionId> {
        let url = self.session_url();
        debug!("Creating eDirectory API session at {}", url);

        let response = self
            .request(Method::POST, &url)
            .header(ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await
            .map_err(|e| ClientError::transport(Operation::OpenSession, e))?;

        let response = expect_status(response, StatusCode::CREATED, Operation::OpenSession).await?;

        let session_id = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| SessionId::new(c.value()))
            .filter(|id| !id.as_str().is_empty())
            .ok_or(ClientError::MissingSessionCookie {
                cookie: SESSION_COOKIE,
            })?;

        info!(session = ?session_id, "eDirectory API session created");
        Ok(session_id)
    }

    /// Fetch the anti-CSRF token for an open session. The id is consumed:
    /// a session gets exactly one token.
    pub async fn acquire_token(&self, session_id: SessionId) -> ClientResult<Session> {
        let url = self.token_url();
        debug!("Requesting anti-CSRF token at {}", url);

        let response = self
            .request(Method::GET, &url)
            .header(ACCEPT, "string")
            .header(COOKIE, session_cookie(&session_id))
            .send()
            .await
            .map_err(|e| ClientError::transport(Operation::AcquireToken, e))?;

        let response = expect_status(response, StatusCode::OK, Operation::AcquireToken).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(Operation::AcquireToken, e))?;
        let token = CsrfToken::from_body(&body);
        if token.is_empty() {
            return Err(ClientError::EmptyToken);
        }

        info!(token = ?token, "Anti-CSRF token acquired");
        Ok(Session::new(session_id, token))
    }

    /// Submit one entry. Never fails: a non-201 status or a transport error
    /// is captured in the returned outcome.
    pub async fn create_entry(
        &self,
        session: &Session,
        entry: DirectoryEntry,
    ) -> ProvisioningOutcome {
        let url = self.entries_url();
        debug!(dn = entry.dn(), kind = %entry.kind(), "Creating entry at {}", url);

        let result = self
            .authorized(Method::POST, &url, session)
            .header(ACCEPT, "application/json")
            .json(&entry)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::transport(Operation::CreateEntry, e);
                warn!(dn = entry.dn(), "{}", err);
                return ProvisioningOutcome::transport_failure(entry, err.to_string());
            }
        };

        let status = response.status();

        // The entry exists once the server answers 201; the body is informational
        if status == StatusCode::CREATED {
            let body = match response.text().await {
                Ok(text) => Some(compact_body(&text)).filter(|b| !b.is_empty()),
                Err(e) => {
                    debug!(dn = entry.dn(), "Unreadable creation response body: {}", e);
                    None
                }
            };
            info!(dn = entry.dn(), "Entry created");
            return ProvisioningOutcome::created(entry, status.as_u16(), body);
        }

        let body = match response.text().await {
            Ok(text) => compact_body(&text),
            Err(e) => format!("<unreadable response body: {}>", e),
        };
        warn!(dn = entry.dn(), status = status.as_u16(), "Entry creation rejected");
        ProvisioningOutcome::rejected(entry, status.as_u16(), body)
    }

    /// Terminate the session. Only `204 No Content` counts as success.
    pub async fn close_session(&self, session: Session) -> ClientResult<()> {
        let url = self.session_url();
        debug!("Deleting eDirectory API session at {}", url);

        let response = self
            .authorized(Method::DELETE, &url, &session)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::transport(Operation::CloseSession, e))?;

        expect_status(response, StatusCode::NO_CONTENT, Operation::CloseSession).await?;

        info!("eDirectory API session deleted");
        Ok(())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.origin {
            Some(origin) => builder.header(ORIGIN, origin),
            None => builder,
        }
    }

    fn authorized(&self, method: Method, url: &str, session: &Session) -> RequestBuilder {
        self.request(method, url)
            .header(COOKIE, session_cookie(session.id()))
            .header(CSRF_HEADER, session.token().as_str())
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url)
            .field("tree", &self.tree)
            .field("organization", &self.organization)
            .finish()
    }
}

fn session_cookie(id: &SessionId) -> String {
    format!("{}={}", SESSION_COOKIE, id.as_str())
}

/// Pass the response through if it has the expected status, otherwise turn
/// it into `UnexpectedStatus` carrying the body.
async fn expect_status(
    response: Response,
    expected: StatusCode,
    operation: Operation,
) -> ClientResult<Response> {
    if response.status() == expected {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus {
        operation,
        status,
        body: compact_body(&body),
    })
}

/// Single-line rendering of a response body: JSON is re-serialized without
/// whitespace, anything else is trimmed.
pub fn compact_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => text.trim().to_string(),
    }
}
