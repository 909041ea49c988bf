//! Authenticated session handle

use edir_core::{CsrfToken, SessionId};

/// An open session holding its anti-CSRF token.
///
/// Only [`SessionClient::acquire_token`](crate::SessionClient::acquire_token)
/// can build one, so holding a `Session` proves both the session and token
/// requests succeeded. It is not `Clone`; closing consumes it.
///
/// ```compile_fail
/// use edir_client::Session;
/// use edir_core::{CsrfToken, SessionId};
///
/// let forged = Session::new(SessionId::new("abc"), CsrfToken::from_body("t"));
/// ```
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    token: CsrfToken,
}

impl Session {
    pub(crate) fn new(id: SessionId, token: CsrfToken) -> Self {
        Self { id, token }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn token(&self) -> &CsrfToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_debug_is_redacted() {
        let session = Session::new(
            SessionId::new("0123456789abcdef"),
            CsrfToken::from_body("tokenvalue-xyz"),
        );
        let debug = format!("{:?}", session);
        assert!(debug.contains("0123***"));
        assert!(!debug.contains("0123456789abcdef"));
        assert!(!debug.contains("tokenvalue-xyz"));
    }
}
