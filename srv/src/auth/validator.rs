//! Access token verification.
//!
//! Provides functions to verify HS256 access tokens and read their claims.
//!
//! # Pre-conditions
//! - The secret must be the one the token was issued with.
//!
//! # Post-conditions
//! - On success, the token's signature verified and `exp` has not passed.
//! - On failure, the error says whether verification or expiry failed.
//!
//! # Invariants
//! - Verification is stateless and does not modify any external state.
//! - The signature is checked before expiry: a forged token never reports
//!   `TokenExpired`.

use jsonwebtoken::{DecodingKey, Validation, decode};

use super::issuer::TOKEN_ALGORITHM;
use super::{ClaimField, TokenClaims, TokenError};
use crate::time::{SystemTimeSource, TimeSource};

/// Verifies a token and returns its claims, using the system clock.
///
/// # Errors
/// Returns `TokenError::InvalidSignature` or `TokenError::TokenExpired`.
pub fn extract_claims(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    extract_claims_at(token, secret, &SystemTimeSource)
}

/// Verifies a token against `secret` and checks `exp` against `clock`.
///
/// # Arguments
/// * `token` - The encoded token string.
/// * `secret` - The shared HMAC secret.
/// * `clock` - Source of the current time for the expiry check.
///
/// # Returns
/// The verified claims on success.
///
/// # Errors
/// Returns `TokenError::InvalidSignature` if the token does not verify and
/// `TokenError::TokenExpired` if it verified but `exp` is in the past.
pub fn extract_claims_at(
    token: &str,
    secret: &[u8],
    clock: &impl TimeSource,
) -> Result<TokenClaims, TokenError> {
    let claims = decode_verified(token, secret)?;

    if claims.is_expired_at(clock.now_secs()) {
        return Err(TokenError::TokenExpired);
    }

    Ok(claims)
}

/// Validates a token together with the denormalized fields that travel
/// alongside it, using the system clock.
///
/// # Errors
/// Returns `TokenError::InvalidSignature`, `TokenError::TokenExpired`, or
/// `TokenError::ClaimsMismatch`.
pub fn validate_token(
    token: &str,
    expires: i64,
    scope: &str,
    secret: &[u8],
) -> Result<(), TokenError> {
    validate_token_at(token, expires, scope, secret, &SystemTimeSource)
}

/// Validates a token and cross-checks `expires` and `scope` against the
/// signed claims.
///
/// # Errors
/// Fails as [`extract_claims_at`] does, then with `TokenError::ClaimsMismatch`
/// naming the first field that disagrees.
pub fn validate_token_at(
    token: &str,
    expires: i64,
    scope: &str,
    secret: &[u8],
    clock: &impl TimeSource,
) -> Result<(), TokenError> {
    let claims = extract_claims_at(token, secret, clock)?;

    if claims.exp != expires {
        return Err(TokenError::ClaimsMismatch {
            field: ClaimField::Expires,
        });
    }
    if claims.custom.scope != scope {
        return Err(TokenError::ClaimsMismatch {
            field: ClaimField::Scope,
        });
    }

    Ok(())
}

/// Decodes a token and verifies its signature without judging expiry.
///
/// `exp` must be present, but the comparison against "now" is left to the
/// caller's clock instead of the library's.
fn decode_verified(token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
    let key = DecodingKey::from_secret(secret);

    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(map_jwt_error)
}

/// Maps jsonwebtoken errors to our `TokenError` type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        _ => TokenError::InvalidSignature,
    }
}
