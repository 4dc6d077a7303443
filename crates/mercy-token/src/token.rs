//! Token issuance and verification.

use crate::claims::SessionClaims;
use crate::error::TokenError;
use crate::keys::KeyPair;
use biscuit_auth::builder::{AuthorizerBuilder, Rule};
use biscuit_auth::macros::fact;
use biscuit_auth::{Authorizer, Biscuit};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Issues and verifies session tokens with a single server keypair.
pub struct TokenService {
    keypair: KeyPair,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(keypair: KeyPair, lifetime: Duration) -> Self {
        Self {
            keypair,
            lifetime_secs: i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs.max(0) as u64)
    }

    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let issued_at = now.timestamp();
        let expires_at = issued_at.saturating_add(self.lifetime_secs);

        let biscuit = Biscuit::builder()
            .fact(fact!("subject({subject})", subject = subject.to_string()))
            .map_err(|e| TokenError::Creation(e.to_string()))?
            .fact(fact!("issued_at({issued_at})", issued_at = issued_at))
            .map_err(|e| TokenError::Creation(e.to_string()))?
            .fact(fact!("expires_at({expires_at})", expires_at = expires_at))
            .map_err(|e| TokenError::Creation(e.to_string()))?
            .build(self.keypair.inner())
            .map_err(|e| TokenError::Creation(e.to_string()))?;

        biscuit
            .to_base64()
            .map_err(|e| TokenError::Creation(e.to_string()))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token's signature and expiry as of `now`.
    ///
    /// Signature and encoding failures are [`TokenError::Malformed`]; a
    /// correctly signed token past its expiry is always
    /// [`TokenError::Expired`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let biscuit = Biscuit::from_base64(token, self.keypair.public_key())
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        let now_secs = now.timestamp();
        let mut authorizer = AuthorizerBuilder::new()
            .code(format!(
                r#"
                time({now_secs});
                allow if true;
                "#
            ))
            .map_err(|e| TokenError::Malformed(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        authorizer
            .authorize()
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        let claims = SessionClaims {
            subject: query_string(&mut authorizer, "subject")?,
            issued_at: query_int(&mut authorizer, "issued_at")?,
            expires_at: query_int(&mut authorizer, "expires_at")?,
        };

        if claims.is_expired_at(now) {
            let expired_at = claims
                .expires_at_utc()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| claims.expires_at.to_string());
            return Err(TokenError::Expired { expired_at });
        }

        Ok(claims)
    }
}

fn fact_rule(name: &str) -> Result<Rule, TokenError> {
    format!("data($x) <- {name}($x)")
        .parse()
        .map_err(|e: biscuit_auth::error::Token| TokenError::Malformed(e.to_string()))
}

fn missing(name: &str) -> TokenError {
    TokenError::Malformed(format!("missing claim '{name}'"))
}

fn query_string(authorizer: &mut Authorizer, name: &str) -> Result<String, TokenError> {
    let results: Vec<(String,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    results
        .into_iter()
        .next()
        .map(|(value,)| value)
        .ok_or_else(|| missing(name))
}

fn query_int(authorizer: &mut Authorizer, name: &str) -> Result<i64, TokenError> {
    let results: Vec<(i64,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;
    results
        .into_iter()
        .next()
        .map(|(value,)| value)
        .ok_or_else(|| missing(name))
}
