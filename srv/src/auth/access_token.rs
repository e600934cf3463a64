//! Access token envelope.
//!
//! An `AccessToken` bundles the signed token string with copies of its
//! expiration and scope, so clients and cookies can read them without
//! verifying anything. Those copies are not trusted: `validate` checks
//! them against the signed claims.

use serde::{Deserialize, Serialize};

use super::{TokenClaims, TokenError, extract_claims_at, validate_token_at};
use crate::time::{SystemTimeSource, TimeSource};

/// A signed token plus denormalized metadata, as handed to clients.
///
/// Serializes as `{"access_token": "...", "expires": N, "scope": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The signed token string.
    pub access_token: String,
    /// Expiration copied from the claims, in Unix seconds.
    pub expires: i64,
    /// Scope copied from the claims.
    pub scope: String,
}

impl AccessToken {
    /// Bundle a token string with its metadata. Nothing is verified here.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires: i64, scope: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires,
            scope: scope.into(),
        }
    }

    /// Verify the token and cross-check the envelope fields, using the
    /// system clock.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidSignature`, `TokenError::TokenExpired`, or
    /// `TokenError::ClaimsMismatch`.
    pub fn validate(&self, secret: &[u8]) -> Result<(), TokenError> {
        self.validate_at(secret, &SystemTimeSource)
    }

    /// Like [`AccessToken::validate`], with an explicit clock.
    pub fn validate_at(&self, secret: &[u8], clock: &impl TimeSource) -> Result<(), TokenError> {
        validate_token_at(&self.access_token, self.expires, &self.scope, secret, clock)
    }

    /// Verify the token and return its signed claims.
    ///
    /// The envelope fields are ignored; use this when only the signed view matters.
    pub fn claims(&self, secret: &[u8]) -> Result<TokenClaims, TokenError> {
        self.claims_at(secret, &SystemTimeSource)
    }

    /// Like [`AccessToken::claims`], with an explicit clock.
    pub fn claims_at(
        &self,
        secret: &[u8],
        clock: &impl TimeSource,
    ) -> Result<TokenClaims, TokenError> {
        extract_claims_at(&self.access_token, secret, clock)
    }

    /// Seconds until expiry at `now_secs`, or zero if already past.
    ///
    /// Reads the unverified `expires` field, so it is only a hint (for
    /// example a cookie `Max-Age`).
    #[must_use]
    pub const fn remaining_secs(&self, now_secs: i64) -> i64 {
        let remaining = self.expires.saturating_sub(now_secs);
        if remaining > 0 { remaining } else { 0 }
    }
}
