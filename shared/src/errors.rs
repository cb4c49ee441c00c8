//! Error types for the credential service

use thiserror::Error;

/// Outcomes of the credential workflow that callers must handle
///
/// `InvalidCredentials` covers both an unknown username and a wrong
/// password. The two cases must never be distinguishable from outside.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A local fault (hashing or signing), not a property of the request
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Reasons a token fails verification
///
/// These are routine outcomes, not faults. Callers treat both as
/// "access denied".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,
}
