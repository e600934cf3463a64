// Shared plumbing for the service family (frontend, discovery, metadata,
// authz, data-management, data-bookkeeping):
//  - YAML configuration, loaded once into an immutable `SrvConfig`
//  - logging setup with optional daily rotation
//  - stateless access tokens: issue, validate, read claims
//
// Life of a token:
// 1. authz builds a `TokenAuthority` from `SrvConfig::token_settings`
// 2. after authenticating a client, it issues an `AccessToken` envelope
// 3. other services verify the bearer string with the same secret

pub mod auth;
pub mod config;
pub mod logging;
pub mod time;

mod e2e_tests;
mod testing;

use time::{SystemTimeSource, TimeSource};

/// Version line printed by `--version`.
#[must_use]
pub fn build_info() -> String {
    format!(
        "version={} date={}",
        env!("CARGO_PKG_VERSION"),
        SystemTimeSource.now_secs()
    )
}
