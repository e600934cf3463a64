//! Test envelopes whose fields were changed after issuance.

use crate::auth::{ClaimField, TokenAuthority, TokenError, TokenSettings};
use crate::testing::FixedTimeSource;

fn authority(clock: &FixedTimeSource) -> TokenAuthority<&FixedTimeSource> {
    let settings = TokenSettings::new("envelope-secret", 60).expect("valid settings");
    TokenAuthority::with_clock(settings, clock)
}

#[test]
fn test_scope_upgrade_detected() {
    let clock = FixedTimeSource::default_start();
    let authority = authority(&clock);
    let mut envelope = authority.issue("read").expect("issue token");

    envelope.scope = "write".to_string();

    assert_eq!(
        authority.validate(&envelope),
        Err(TokenError::ClaimsMismatch {
            field: ClaimField::Scope
        })
    );
}

#[test]
fn test_lifetime_extension_detected() {
    let clock = FixedTimeSource::default_start();
    let authority = authority(&clock);
    let mut envelope = authority.issue("read").expect("issue token");

    envelope.expires += 3600;

    assert_eq!(
        authority.validate(&envelope),
        Err(TokenError::ClaimsMismatch {
            field: ClaimField::Expires
        })
    );
}

#[test]
fn test_swapped_token_string_detected() {
    let clock = FixedTimeSource::default_start();
    let authority = authority(&clock);
    let read = authority.issue("read").expect("issue read token");
    let mut write = authority.issue("write").expect("issue write token");

    write.access_token = read.access_token;

    assert_eq!(
        authority.validate(&write),
        Err(TokenError::ClaimsMismatch {
            field: ClaimField::Scope
        })
    );
}

#[test]
fn test_expiry_reported_before_mismatch() {
    let clock = FixedTimeSource::default_start();
    let authority = authority(&clock);
    let mut envelope = authority.issue("read").expect("issue token");
    envelope.scope = "write".to_string();

    clock.advance(61);

    assert_eq!(authority.validate(&envelope), Err(TokenError::TokenExpired));
}
