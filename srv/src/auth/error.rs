//! Errors produced by token issuance and validation.

/// The envelope field that disagreed with the signed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimField {
    /// The denormalized `expires` timestamp.
    Expires,
    /// The denormalized `scope` label.
    Scope,
}

impl std::fmt::Display for ClaimField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expires => write!(f, "expires"),
            Self::Scope => write!(f, "scope"),
        }
    }
}

/// Error returned when a token cannot be issued or does not validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be encoded or signed.
    SigningError(String),
    /// The token failed verification: wrong secret, corrupted or malformed
    /// token, unexpected algorithm, or missing `exp` claim.
    InvalidSignature,
    /// The token verified but its `exp` claim is in the past.
    TokenExpired,
    /// An envelope's denormalized field does not match the signed claims.
    ClaimsMismatch {
        /// The field that disagreed.
        field: ClaimField,
    },
}

impl TokenError {
    /// Whether the caller should treat this as an authentication failure
    /// (respond 401) rather than an internal fault.
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::TokenExpired)
    }
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SigningError(reason) => write!(f, "failed to sign token: {reason}"),
            Self::InvalidSignature => write!(f, "invalid token signature"),
            Self::TokenExpired => write!(f, "token has expired"),
            Self::ClaimsMismatch { field } => {
                write!(f, "token envelope {field} does not match signed claims")
            }
        }
    }
}

impl std::error::Error for TokenError {}
