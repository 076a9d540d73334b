//! Login client for the TrueCraft launcher.
//!
//! `LoginHandler` speaks the auth server's `/api/login` protocol,
//! `CredentialStore` persists remember-me settings and `LoginForm` ties the
//! two together the way a login screen uses them.

#[macro_use]
pub mod output;

pub mod api;
pub mod config;
pub mod errors;
pub mod form;
pub mod protocol;
pub mod types;

pub use api::LoginHandler;
pub use config::{CredentialStore, FileCredentialStore, MemoryCredentialStore, RememberedCredentials};
pub use errors::LoginError;
pub use form::{FormState, LoginForm};
pub use types::{Credentials, LoginResult, Session};
