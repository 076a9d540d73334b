use serde::{Deserialize, Serialize};

/// Version number the auth server uses for client compatibility checks.
pub const PROTOCOL_VERSION: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty before anything goes on the wire.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Form body of `POST /api/login`.
#[derive(Serialize, Debug)]
pub struct LoginRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
    pub version: u32,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            user: &credentials.username,
            password: &credentials.password,
            version: PROTOCOL_VERSION,
        }
    }
}

/// Authenticated identity returned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    Success { username: String, session_id: String },
    Failure { message: String },
}

impl LoginResult {
    pub fn failure(message: impl Into<String>) -> Self {
        LoginResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success { .. })
    }

    pub fn session(&self) -> Option<Session> {
        match self {
            LoginResult::Success {
                username,
                session_id,
            } => Some(Session {
                username: username.clone(),
                session_id: session_id.clone(),
            }),
            LoginResult::Failure { .. } => None,
        }
    }
}

impl From<Session> for LoginResult {
    fn from(session: Session) -> Self {
        LoginResult::Success {
            username: session.username,
            session_id: session.session_id,
        }
    }
}
