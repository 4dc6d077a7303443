//! # mercy-token
//!
//! Session tokens for authenticated staff.
//!
//! A session token is a Biscuit token signed with the server's Ed25519 key.
//! Its authority block carries three facts:
//!
//! | Fact | Meaning |
//! |------|---------|
//! | `subject($s)` | external identifier of the staff member |
//! | `issued_at($t)` | issuance, seconds since the epoch |
//! | `expires_at($t)` | `issued_at` plus the configured lifetime |
//!
//! Tokens are never persisted server-side; they expire purely by time and
//! there is no revocation.

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use claims::SessionClaims;
pub use error::TokenError;
pub use keys::KeyPair;
pub use token::TokenService;
