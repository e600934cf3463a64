//! Access token issuance.
//!
//! Tokens are HS256-signed JWTs: `header.payload.signature`, each segment
//! base64url-encoded. Issuance is a pure function of its inputs.
//!
//! # Pre-conditions
//! - `secret` should be non-empty. This is not checked here; configuration
//!   loading rejects empty secrets before an issuer is ever built.
//! - `expires_at` is taken as given, even if it is already in the past.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use super::{CustomClaims, TokenClaims, TokenError};

/// The signing algorithm for every token this crate issues or accepts.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues a signed access token carrying `claims` and expiring at `expires_at`.
///
/// # Arguments
/// * `secret` - The shared HMAC secret.
/// * `expires_at` - Absolute expiration in Unix seconds.
/// * `claims` - The custom claims to embed.
///
/// # Errors
/// Returns `TokenError::SigningError` if the claims cannot be encoded or signed.
pub fn issue_token(
    secret: &[u8],
    expires_at: i64,
    claims: &CustomClaims,
) -> Result<String, TokenError> {
    let payload = TokenClaims::new(claims.clone(), expires_at);
    let header = Header::new(TOKEN_ALGORITHM);

    encode(&header, &payload, &EncodingKey::from_secret(secret))
        .map_err(|e| TokenError::SigningError(e.to_string()))
}
