//! Signing keys for session tokens.

use crate::error::TokenError;
use biscuit_auth::{Algorithm, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey};
use rand::RngCore;
use std::path::Path;

/// An Ed25519 keypair for signing and verifying session tokens.
pub struct KeyPair {
    inner: BiscuitKeyPair,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Result<Self, TokenError> {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| TokenError::KeyGeneration(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            inner: BiscuitKeyPair::from(&private_key),
        }
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, TokenError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| TokenError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Load a keypair from a file holding the hex private key.
    pub fn load_from_file(path: &Path) -> Result<Self, TokenError> {
        let hex = std::fs::read_to_string(path)?;
        Self::from_private_key_hex(&hex)
    }

    pub fn inner(&self) -> &BiscuitKeyPair {
        &self.inner
    }

    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }
}
