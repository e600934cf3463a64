//! Test a token issued with an expiry that is already in the past.
//!
//! Issuance never consults the clock, so it succeeds; validation does, so
//! the same envelope is rejected as expired against any real clock.

use crate::auth::{
    AccessToken, CustomClaims, TokenError, extract_claims, extract_claims_at, issue_token,
};
use crate::e2e_tests::helpers::SECRET;
use crate::testing::FixedTimeSource;

const EXPIRES_AT: i64 = 100;

#[test]
fn test_past_expiry_issues_but_fails_validation() {
    let scope = "read";
    let token_str = issue_token(SECRET.as_bytes(), EXPIRES_AT, &CustomClaims::new(scope))
        .expect("issuance does not check the clock");
    assert_eq!(token_str.split('.').count(), 3);

    let token = AccessToken::new(token_str.clone(), EXPIRES_AT, scope);
    assert_eq!(token.validate(SECRET.as_bytes()), Err(TokenError::TokenExpired));
    assert_eq!(
        extract_claims(&token_str, SECRET.as_bytes()),
        Err(TokenError::TokenExpired)
    );
}

#[test]
fn test_past_expiry_claims_readable_before_exp() {
    let token_str = issue_token(SECRET.as_bytes(), EXPIRES_AT, &CustomClaims::new("read"))
        .expect("issue token");
    let clock = FixedTimeSource::new(EXPIRES_AT - 1);

    let claims = extract_claims_at(&token_str, SECRET.as_bytes(), &clock).expect("claims");

    assert_eq!(claims.custom.scope, "read");
    clock.set(EXPIRES_AT + 1);
    assert_eq!(
        extract_claims_at(&token_str, SECRET.as_bytes(), &clock),
        Err(TokenError::TokenExpired)
    );
}

#[test]
fn test_past_expiry_wrong_secret_is_not_expired() {
    let token_str = issue_token(SECRET.as_bytes(), EXPIRES_AT, &CustomClaims::new("read"))
        .expect("issue token");
    let token = AccessToken::new(token_str, EXPIRES_AT, "read");

    assert_eq!(token.validate(b"another"), Err(TokenError::InvalidSignature));
}
