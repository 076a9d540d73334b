//! Login response format.
//!
//! The auth server answers `/api/login` with either a colon-separated
//! record or a plain-text error message. A body is a record if and only if
//! it contains a `:`, so an error message with a colon in it will be read as
//! a (malformed) record. Anything that wants to change that rule changes
//! `parse_login_response` and nothing else.
//!
//! Record layout after dropping empty segments:
//!
//! | index | meaning                   |
//! |-------|---------------------------|
//! | 0, 1  | opaque, ignored           |
//! | 2     | canonical username        |
//! | 3     | session id                |

use crate::errors::LoginError;
use crate::types::Session;

const DELIMITER: char = ':';
const USERNAME_FIELD: usize = 2;
const SESSION_FIELD: usize = 3;

pub fn parse_login_response(body: &str) -> Result<Session, LoginError> {
    let body = body.trim();

    if body.is_empty() {
        return Err(LoginError::Protocol("empty response body".to_string()));
    }

    if !body.contains(DELIMITER) {
        return Err(LoginError::Rejected(body.to_string()));
    }

    let fields: Vec<&str> = body.split(DELIMITER).filter(|f| !f.is_empty()).collect();
    match (fields.get(USERNAME_FIELD), fields.get(SESSION_FIELD)) {
        (Some(username), Some(session_id)) => Ok(Session {
            username: (*username).to_string(),
            session_id: (*session_id).to_string(),
        }),
        _ => Err(LoginError::Protocol(format!(
            "{body} (expected at least {} fields, got {})",
            SESSION_FIELD + 1,
            fields.len()
        ))),
    }
}
