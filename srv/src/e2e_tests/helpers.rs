//! Common helpers for end-to-end tests.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::config::SrvConfig;

/// Secret used by the sample configuration.
pub const SECRET: &str = "lksjdlfkjsd";

/// Token lifetime used by the sample configuration.
pub const LIFETIME_SECS: i64 = 600;

/// A config file on disk, removed when dropped.
pub struct TestConfigFile {
    file: NamedTempFile,
}

impl TestConfigFile {
    /// Write the sample configuration to a fresh temporary file.
    #[must_use]
    pub fn sample() -> Self {
        Self::with_contents(&format!(
            "Authz:\n  WebServer:\n    Port: 8380\n  Encryption:\n    Secret: {SECRET}\n  TokenExpires: {LIFETIME_SECS}\n"
        ))
    }

    /// Write `contents` to a fresh temporary file.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_contents(contents: &str) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create temp config");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp config");
        Self { file }
    }

    /// Load the file through the normal config path.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn load(&self) -> SrvConfig {
        SrvConfig::load(Some(self.file.path())).expect("Failed to load temp config")
    }
}
