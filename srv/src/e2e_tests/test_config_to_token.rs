//! Test the full path from a config file to an issued and verified token.

use crate::auth::{AccessToken, TokenAuthority, extract_claims_at};
use crate::e2e_tests::helpers::*;
use crate::testing::FixedTimeSource;

#[test]
fn test_issue_from_config_file() {
    let config = TestConfigFile::sample().load();
    let settings = config.token_settings().expect("token settings");
    let clock = FixedTimeSource::default_start();
    let authority = TokenAuthority::with_clock(settings, &clock);

    let envelope = authority.issue("read").expect("issue token");

    assert_eq!(envelope.expires, 1_700_000_000 + LIFETIME_SECS);
    assert_eq!(envelope.validate_at(SECRET.as_bytes(), &clock), Ok(()));

    let claims =
        extract_claims_at(&envelope.access_token, SECRET.as_bytes(), &clock).expect("claims");
    assert_eq!(claims.scope(), "read");
}

#[test]
fn test_envelope_survives_json_transport() {
    let config = TestConfigFile::sample().load();
    let clock = FixedTimeSource::default_start();
    let authority =
        TokenAuthority::with_clock(config.token_settings().expect("token settings"), &clock);
    let envelope = authority.issue("write").expect("issue token");

    let body = serde_json::to_string(&envelope).expect("serialize envelope");
    let received: AccessToken = serde_json::from_str(&body).expect("parse envelope");

    assert_eq!(received, envelope);
    assert_eq!(authority.validate(&received), Ok(()));
}

#[test]
fn test_other_service_verifies_with_shared_secret() {
    // authz issues; another service holding the same secret verifies.
    let config = TestConfigFile::sample().load();
    let clock = FixedTimeSource::default_start();
    let authz = TokenAuthority::with_clock(config.token_settings().expect("settings"), &clock);
    let envelope = authz.issue("read").expect("issue token");

    let claims = extract_claims_at(
        &envelope.access_token,
        config.authz.encryption.secret.as_bytes(),
        &clock,
    )
    .expect("claims");

    assert_eq!(claims.scope(), envelope.scope);
    assert_eq!(claims.expires_at(), envelope.expires);
}

#[test]
fn test_config_without_secret_cannot_issue() {
    let config = TestConfigFile::with_contents("Authz:\n  TokenExpires: 600\n").load();

    assert!(config.token_settings().is_err());
}
