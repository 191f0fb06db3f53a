//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `SessionStore`: login/logout and the persisted token + profile pair
//! - `KeyValueStore`: the durable substrate (file-backed or in-memory)
//! - `CredentialStore`: optional remember-me storage via the OS keychain
//!
//! The token and user profile are always written and cleared together.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use session::{ConnectionStatus, LoginResponse, SessionStore, VerifyResponse};
pub use store::{FileStore, KeyValueStore, MemoryStore};
