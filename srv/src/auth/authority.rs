//! Configured token authority.
//!
//! Services do not call the issuer with raw values scattered around their
//! handlers. They build one `TokenAuthority` at startup from the loaded
//! configuration and share it.
//!
//! # Pre-conditions
//! - `TokenSettings` secrets are non-empty and lifetimes are positive.
//!
//! # Post-conditions
//! - Every `AccessToken` returned by `issue` agrees with its signed claims.
//!
//! # Invariants
//! - Settings are immutable once the authority is built.
//! - The secret is never logged.

use super::{
    AccessToken, CustomClaims, TokenClaims, TokenError, extract_claims_at, issue_token,
};
use crate::time::{SystemTimeSource, TimeSource};

/// Error returned when token settings are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSettingsError {
    /// The signing secret is empty.
    EmptySecret,
    /// The token lifetime is zero or negative.
    NonPositiveLifetime(i64),
}

impl std::fmt::Display for TokenSettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "token signing secret must not be empty"),
            Self::NonPositiveLifetime(secs) => {
                write!(f, "token lifetime must be positive, got {secs}s")
            }
        }
    }
}

impl std::error::Error for TokenSettingsError {}

/// Signing secret and default lifetime for issued tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSettings {
    secret: Vec<u8>,
    lifetime_secs: i64,
}

impl TokenSettings {
    /// Create validated token settings.
    ///
    /// # Errors
    /// Returns `TokenSettingsError::EmptySecret` for an empty secret and
    /// `TokenSettingsError::NonPositiveLifetime` for a lifetime below one second.
    pub fn new(secret: impl Into<Vec<u8>>, lifetime_secs: i64) -> Result<Self, TokenSettingsError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenSettingsError::EmptySecret);
        }
        if lifetime_secs <= 0 {
            return Err(TokenSettingsError::NonPositiveLifetime(lifetime_secs));
        }
        Ok(Self {
            secret,
            lifetime_secs,
        })
    }

    /// The shared signing secret.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Default token lifetime in seconds.
    #[must_use]
    pub const fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

/// Issues and checks access tokens with configured settings.
#[derive(Debug, Clone)]
pub struct TokenAuthority<T: TimeSource = SystemTimeSource> {
    settings: TokenSettings,
    clock: T,
}

impl TokenAuthority<SystemTimeSource> {
    /// Create an authority backed by the system clock.
    #[must_use]
    pub const fn new(settings: TokenSettings) -> Self {
        Self::with_clock(settings, SystemTimeSource)
    }
}

impl<T: TimeSource> TokenAuthority<T> {
    /// Create an authority with an explicit clock.
    #[must_use]
    pub const fn with_clock(settings: TokenSettings, clock: T) -> Self {
        Self { settings, clock }
    }

    /// The settings this authority signs with.
    #[must_use]
    pub const fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issue a token for `scope` that expires after the configured lifetime.
    ///
    /// # Errors
    /// Returns `TokenError::SigningError` if signing fails.
    pub fn issue(&self, scope: &str) -> Result<AccessToken, TokenError> {
        let expires_at = self
            .clock
            .now_secs()
            .saturating_add(self.settings.lifetime_secs);
        self.issue_until(scope, expires_at)
    }

    /// Issue a token for `scope` that expires at `expires_at`.
    ///
    /// # Errors
    /// Returns `TokenError::SigningError` if signing fails.
    pub fn issue_until(&self, scope: &str, expires_at: i64) -> Result<AccessToken, TokenError> {
        let token = issue_token(
            &self.settings.secret,
            expires_at,
            &CustomClaims::new(scope),
        )
        .inspect_err(|e| tracing::error!("failed to issue token: {e}"))?;

        tracing::debug!(scope, expires_at, "issued access token");
        Ok(AccessToken::new(token, expires_at, scope))
    }

    /// Fully validate an envelope against this authority's secret and clock.
    ///
    /// # Errors
    /// Returns the `TokenError` describing the first failed check.
    pub fn validate(&self, envelope: &AccessToken) -> Result<(), TokenError> {
        envelope
            .validate_at(&self.settings.secret, &self.clock)
            .inspect_err(log_rejection)
    }

    /// Verify a bare token string and return its claims.
    ///
    /// # Errors
    /// Returns `TokenError::InvalidSignature` or `TokenError::TokenExpired`.
    pub fn claims(&self, token: &str) -> Result<TokenClaims, TokenError> {
        extract_claims_at(token, &self.settings.secret, &self.clock).inspect_err(log_rejection)
    }
}

/// Client-side failures are routine; anything else points at a caller bug.
fn log_rejection(error: &TokenError) {
    if error.is_unauthenticated() {
        tracing::debug!("access token rejected: {error}");
    } else {
        tracing::warn!("access token misuse: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ClaimField;
    use crate::testing::FixedTimeSource;

    fn settings() -> TokenSettings {
        TokenSettings::new(b"authz-secret".to_vec(), 3600).expect("valid settings")
    }

    #[test]
    fn test_settings_valid() {
        let settings = settings();
        assert_eq!(settings.secret(), b"authz-secret");
        assert_eq!(settings.lifetime_secs(), 3600);
    }

    #[test]
    fn test_settings_empty_secret() {
        let result = TokenSettings::new(Vec::new(), 3600);
        assert_eq!(result, Err(TokenSettingsError::EmptySecret));
    }

    #[test]
    fn test_settings_non_positive_lifetime() {
        assert_eq!(
            TokenSettings::new("secret", 0),
            Err(TokenSettingsError::NonPositiveLifetime(0))
        );
        assert_eq!(
            TokenSettings::new("secret", -5),
            Err(TokenSettingsError::NonPositiveLifetime(-5))
        );
    }

    #[test]
    fn test_settings_debug_redacts_secret() {
        let debug = format!("{:?}", settings());
        assert!(!debug.contains("authz-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_settings_error_display() {
        assert_eq!(
            TokenSettingsError::EmptySecret.to_string(),
            "token signing secret must not be empty"
        );
        assert_eq!(
            TokenSettingsError::NonPositiveLifetime(0).to_string(),
            "token lifetime must be positive, got 0s"
        );
    }

    #[test]
    fn test_issue_uses_lifetime() {
        let clock = FixedTimeSource::default_start();
        let authority = TokenAuthority::with_clock(settings(), &clock);

        let envelope = authority.issue("read").expect("issue token");

        assert_eq!(envelope.expires, clock.now_secs() + 3600);
        assert_eq!(envelope.scope, "read");
        assert_eq!(authority.validate(&envelope), Ok(()));
    }

    #[test]
    fn test_issue_until_explicit_expiry() {
        let clock = FixedTimeSource::default_start();
        let authority = TokenAuthority::with_clock(settings(), &clock);
        let expires_at = clock.now_secs() + 5;

        let envelope = authority.issue_until("write", expires_at).expect("issue token");
        let claims = authority.claims(&envelope.access_token).expect("claims");

        assert_eq!(claims.expires_at(), expires_at);
        assert_eq!(claims.scope(), "write");
    }

    #[test]
    fn test_issued_token_expires_with_clock() {
        let clock = FixedTimeSource::default_start();
        let authority = TokenAuthority::with_clock(settings(), &clock);
        let envelope = authority.issue("read").expect("issue token");

        clock.advance(3601);

        assert_eq!(authority.validate(&envelope), Err(TokenError::TokenExpired));
        assert_eq!(
            authority.claims(&envelope.access_token),
            Err(TokenError::TokenExpired)
        );
    }

    #[test]
    fn test_validate_reports_mismatch() {
        let clock = FixedTimeSource::default_start();
        let authority = TokenAuthority::with_clock(settings(), &clock);
        let mut envelope = authority.issue("read").expect("issue token");
        envelope.scope = "admin".to_string();

        assert_eq!(
            authority.validate(&envelope),
            Err(TokenError::ClaimsMismatch {
                field: ClaimField::Scope
            })
        );
    }

    #[test]
    fn test_authorities_with_different_secrets() {
        let clock = FixedTimeSource::default_start();
        let issuing = TokenAuthority::with_clock(settings(), &clock);
        let other = TokenAuthority::with_clock(
            TokenSettings::new("different-secret", 3600).expect("valid settings"),
            &clock,
        );

        let envelope = issuing.issue("read").expect("issue token");

        assert_eq!(other.validate(&envelope), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_system_clock_authority() {
        let authority = TokenAuthority::new(settings());
        let envelope = authority.issue("read").expect("issue token");

        assert_eq!(authority.validate(&envelope), Ok(()));
        assert_eq!(envelope.validate(authority.settings().secret()), Ok(()));
    }
}
