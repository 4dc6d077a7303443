//! Error types for the token crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The token verified but its expiry has elapsed.
    #[error("token has expired at {expired_at}")]
    Expired { expired_at: String },

    /// Bad encoding, bad signature, or missing claims.
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to generate keypair: {0}")]
    KeyGeneration(String),

    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    #[error("failed to create token: {0}")]
    Creation(String),

    /// IO error (reading key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
