//! Claims carried inside an access token.
//!
//! The payload is a flat JSON object: the custom claims (currently only
//! `scope`) sit next to the registered `exp` claim.
//!
//! ```json
//! {"scope": "read", "exp": 1700003600}
//! ```

use serde::{Deserialize, Serialize};

/// Application-defined claims embedded in a token.
///
/// `scope` is opaque here; callers decide what "read" or "write" grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomClaims {
    /// Authorization scope label.
    pub scope: String,
}

impl CustomClaims {
    /// Create claims for the given scope.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }
}

/// The full claim set of a token: custom claims plus expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Custom claims, flattened into the top-level payload.
    #[serde(flatten)]
    pub custom: CustomClaims,
    /// Expiration as an absolute Unix timestamp in seconds.
    pub exp: i64,
}

impl TokenClaims {
    /// Combine custom claims with an absolute expiration.
    #[must_use]
    pub const fn new(custom: CustomClaims, expires_at: i64) -> Self {
        Self {
            custom,
            exp: expires_at,
        }
    }

    /// The scope granted by this token.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.custom.scope
    }

    /// The absolute expiration, in Unix seconds.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Whether the token has expired at `now_secs`.
    ///
    /// A token is still valid during the second named by `exp`.
    #[must_use]
    pub const fn is_expired_at(&self, now_secs: i64) -> bool {
        now_secs > self.exp
    }
}
