//! End-to-end tests from a config file to a validated token.
//!
//! Each test file covers a specific scenario, using deterministic clocks
//! wherever expiry matters.

#![cfg(test)]

mod helpers;

mod test_concurrent_validation;
mod test_config_to_token;
mod test_past_expiry;
mod test_tampered_envelope;
