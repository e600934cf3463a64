//! Access token issuance and validation.
//!
//! Tokens are stateless HS256 bearer credentials carrying a scope and an
//! expiration. There is no revocation: a token is valid until its `exp`
//! passes, and invalid forever after.
//!
//! # Pre-conditions
//! - Every call receives the shared secret explicitly; there is no global key.
//!
//! # Post-conditions
//! - Issuance and validation never log, retry, or swallow errors; every
//!   failure is returned to the caller.
//!
//! # Invariants
//! - All functions here are pure over their inputs and the clock, and are
//!   safe to call concurrently.

pub mod access_token;
pub mod authority;
pub mod claims;
pub mod error;
pub mod issuer;
pub mod validator;

pub use access_token::AccessToken;
pub use authority::{TokenAuthority, TokenSettings, TokenSettingsError};
pub use claims::{CustomClaims, TokenClaims};
pub use error::{ClaimField, TokenError};
pub use issuer::{TOKEN_ALGORITHM, issue_token};
pub use validator::{extract_claims, extract_claims_at, validate_token, validate_token_at};
