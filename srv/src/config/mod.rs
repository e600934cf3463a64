//! Service configuration.
//!
//! All services in the family read one YAML file (by default
//! `$HOME/.srv.yaml`) and pick out their own block. The loaded `SrvConfig`
//! is an immutable value: build it once in `main` and pass it, or pieces of
//! it, to whatever needs them.
//!
//! # Invariants
//!
//! - A successfully loaded config always has every section present; absent
//!   keys hold zero values.
//! - Keys match regardless of case (`TokenExpires`, `tokenexpires`).
//!   Keys that match no setting are listed in `ignored_keys`.
//! - `token_settings` never returns an empty secret or a non-positive lifetime.

mod sections;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yml::{Mapping, Value};

use crate::auth::{TokenSettings, TokenSettingsError};

pub use sections::{
    Authz, ChessMetaData, DataBookkeeping, DataManagement, Discovery, Encryption, Frontend,
    Kerberos, MetaData, MongoDb, OAuthRecord, OreCastMetaData, Services, WebServer,
    WebServerOptions,
};

/// Top-level configuration shared by every service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct SrvConfig {
    pub frontend: Frontend,
    pub discovery: Discovery,
    #[serde(rename = "metadata")]
    pub meta_data: MetaData,
    #[serde(rename = "datamanagement")]
    pub data_management: DataManagement,
    #[serde(rename = "databookkeeping")]
    pub data_bookkeeping: DataBookkeeping,
    pub authz: Authz,
    pub kerberos: Kerberos,
    pub services: Services,
    pub encryption: Encryption,
    #[serde(rename = "chessmetadata")]
    pub chess_meta_data: ChessMetaData,
    #[serde(rename = "orecastmetadata")]
    pub ore_cast_meta_data: OreCastMetaData,

    /// Dotted paths of keys in the source document that matched no setting.
    #[serde(skip)]
    pub ignored_keys: Vec<String>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config path was given and `HOME` is not set.
    MissingHome,
    /// The config file could not be read.
    Read { path: PathBuf, message: String },
    /// The config file was read but is not valid YAML for `SrvConfig`.
    Parse { path: PathBuf, message: String },
    /// A setting has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHome => {
                write!(f, "no config file given and HOME is not set")
            }
            Self::Read { path, message } => {
                write!(f, "fail to read {} file, error {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "unable to parse {}, error {message}", path.display())
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl SrvConfig {
    /// Config file name looked up in the home directory.
    pub const DEFAULT_FILE_NAME: &'static str = ".srv.yaml";

    /// Load configuration from `path`, or from `$HOME/.srv.yaml` when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no path is given and `HOME` is not set
    /// - the file cannot be read
    /// - the file is not valid YAML for this structure
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_file(&Self::default_path()?),
        }
    }

    /// The default config location, `$HOME/.srv.yaml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingHome` if `HOME` is unset or empty.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(Self::DEFAULT_FILE_NAME)),
            _ => Err(ConfigError::MissingHome),
        }
    }

    /// Read and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` or `ConfigError::Parse`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = Self::from_yaml_str(&contents).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::debug!("loaded configuration from {}", path.display());
        for key in &config.ignored_keys {
            tracing::warn!("{}: ignoring unknown key {key}", path.display());
        }
        Ok(config)
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document yields the all-defaults configuration.
    ///
    /// # Errors
    ///
    /// Returns the parser's message if the text is not valid YAML for `SrvConfig`.
    pub fn from_yaml_str(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: Value = serde_yml::from_str(text).map_err(|e| e.to_string())?;
        let document = lowercase_keys(document);

        let mut config: Self =
            serde_yml::from_value(document.clone()).map_err(|e| e.to_string())?;

        let recognized = serde_yml::to_value(&config).map_err(|e| e.to_string())?;
        let mut ignored = Vec::new();
        collect_ignored_keys(&document, &recognized, "", &mut ignored);
        config.ignored_keys = ignored;

        Ok(config)
    }

    /// The web server block of the given service.
    #[must_use]
    pub const fn web_server(&self, service: ServiceKind) -> &WebServer {
        match service {
            ServiceKind::Frontend => &self.frontend.web_server,
            ServiceKind::Discovery => &self.discovery.web_server,
            ServiceKind::MetaData => &self.meta_data.web_server,
            ServiceKind::DataManagement => &self.data_management.web_server,
            ServiceKind::DataBookkeeping => &self.data_bookkeeping.web_server,
            ServiceKind::Authz => &self.authz.web_server,
            ServiceKind::ChessMetaData => &self.chess_meta_data.web_server,
            ServiceKind::OreCastMetaData => &self.ore_cast_meta_data.web_server,
        }
    }

    /// Signing settings for access tokens.
    ///
    /// The secret is `Authz.Encryption.Secret`, or the top-level
    /// `Encryption.Secret` when the former is empty. The lifetime is
    /// `Authz.TokenExpires`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the secret is empty or the
    /// lifetime is not positive.
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        let secret = if self.authz.encryption.secret.is_empty() {
            &self.encryption.secret
        } else {
            &self.authz.encryption.secret
        };

        TokenSettings::new(secret.as_bytes(), self.authz.token_expires).map_err(|e| {
            let name = match e {
                TokenSettingsError::EmptySecret => "Encryption.Secret",
                TokenSettingsError::NonPositiveLifetime(_) => "Authz.TokenExpires",
            };
            ConfigError::InvalidValue {
                name: name.to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// Lowercase every mapping key, recursively, so key lookup ignores case.
///
/// When two keys differ only by case, the later one wins.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(key) => Value::String(key.to_lowercase()),
                        other => other,
                    };
                    (key, lowercase_keys(value))
                })
                .collect::<Mapping>(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Record the paths of keys in `document` that have no counterpart in
/// `recognized`, the re-serialized config.
fn collect_ignored_keys(document: &Value, recognized: &Value, prefix: &str, ignored: &mut Vec<String>) {
    match (document, recognized) {
        (Value::Mapping(document), Value::Mapping(recognized)) => {
            for (key, value) in document {
                let name = key.as_str().map_or_else(|| format!("{key:?}"), str::to_string);
                let path = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}.{name}")
                };
                match recognized.get(key) {
                    Some(known) => collect_ignored_keys(value, known, &path, ignored),
                    None => ignored.push(path),
                }
            }
        }
        (Value::Sequence(document), Value::Sequence(recognized)) => {
            for (index, (value, known)) in document.iter().zip(recognized).enumerate() {
                collect_ignored_keys(value, known, &format!("{prefix}[{index}]"), ignored);
            }
        }
        _ => {}
    }
}

/// The services that carry a `WebServer` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Frontend,
    Discovery,
    MetaData,
    DataManagement,
    DataBookkeeping,
    Authz,
    ChessMetaData,
    OreCastMetaData,
}

impl ServiceKind {
    /// Every service, in config file order.
    pub const ALL: [Self; 8] = [
        Self::Frontend,
        Self::Discovery,
        Self::MetaData,
        Self::DataManagement,
        Self::DataBookkeeping,
        Self::Authz,
        Self::ChessMetaData,
        Self::OreCastMetaData,
    ];

    /// The lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Discovery => "discovery",
            Self::MetaData => "metadata",
            Self::DataManagement => "datamanagement",
            Self::DataBookkeeping => "databookkeeping",
            Self::Authz => "authz",
            Self::ChessMetaData => "chessmetadata",
            Self::OreCastMetaData => "orecastmetadata",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a service name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownServiceError(pub String);

impl std::fmt::Display for UnknownServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown service: {}", self.0)
    }
}

impl std::error::Error for UnknownServiceError {}

impl FromStr for ServiceKind {
    type Err = UnknownServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownServiceError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
Frontend:
  WebServer:
    Port: 8344
    Verbose: 1
    LogFile: /tmp/frontend.log
    GinOptions:
      ColorConsole: true
  OAuth:
    - Provider: github
      ClientId: abc
      ClientSecret: xyz
  UserCookieExpires: 600
Authz:
  WebServer:
    Port: 8380
    LogLongFile: true
    Rate: 100-S
    X-Forwarded-Host: example.com
    RootCAs: /etc/certs
    ServerCert: /etc/cert.pem
    DomainNames: [a.example.com, b.example.com]
  Encryption:
    Secret: authz-secret
  TokenExpires: 3600
  ClientId: client
  DBUri: sqlite:///tmp/authz.db
DataBookkeeping:
  DBFile: /tmp/dbs.secrets
  MaxDbConnections: 100
CHESSMetaData:
  WebServer:
    Port: 8300
  MongoDB:
    DBName: chess
  SchemaFiles: [a.json]
  WebSectionKeys:
    General: [Pi, Date]
Services:
  AuthzUrl: http://localhost:8380
Encryption:
  Secret: global-secret
"#;

    #[test]
    fn test_parse_sample() {
        let config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");

        assert_eq!(config.frontend.web_server.port, 8344);
        assert_eq!(config.frontend.web_server.verbose, 1);
        assert!(config.frontend.web_server.options.color_console);
        assert_eq!(config.frontend.oauth.len(), 1);
        assert_eq!(config.frontend.oauth[0].client_id, "abc");
        assert_eq!(config.frontend.user_cookie_expires, 600);

        let authz = &config.authz;
        assert_eq!(authz.web_server.port, 8380);
        assert!(authz.web_server.log_long_file);
        assert_eq!(authz.web_server.limiter_period, "100-S");
        assert_eq!(authz.web_server.x_forwarded_host, "example.com");
        assert_eq!(authz.web_server.root_cas, "/etc/certs");
        assert_eq!(authz.web_server.server_crt, "/etc/cert.pem");
        assert_eq!(authz.web_server.domain_names.len(), 2);
        assert_eq!(authz.encryption.secret, "authz-secret");
        assert_eq!(authz.token_expires, 3600);
        assert_eq!(authz.client_id, "client");
        assert_eq!(authz.db_uri, "sqlite:///tmp/authz.db");

        assert_eq!(config.data_bookkeeping.db_file, "/tmp/dbs.secrets");
        assert_eq!(config.data_bookkeeping.max_db_connections, 100);
        assert_eq!(config.chess_meta_data.mongodb.db_name, "chess");
        assert_eq!(
            config.chess_meta_data.web_section_keys["general"],
            vec!["Pi".to_string(), "Date".to_string()]
        );
        assert_eq!(config.services.authz_url, "http://localhost:8380");
        assert_eq!(config.encryption.secret, "global-secret");
    }

    #[test]
    fn test_parse_sample_has_no_ignored_keys() {
        let config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");
        assert!(config.ignored_keys.is_empty(), "{:?}", config.ignored_keys);
    }

    #[test]
    fn test_lowercase_keys_accepted() {
        let config = SrvConfig::from_yaml_str(
            "authz:\n  tokenexpires: 3600\n  encryption:\n    secret: s3cr3t\n",
        )
        .expect("parse lowercase document");

        assert_eq!(config.authz.token_expires, 3600);
        assert_eq!(config.authz.encryption.secret, "s3cr3t");

        let settings = config.token_settings().expect("token settings");
        assert_eq!(settings.secret(), b"s3cr3t");
        assert_eq!(settings.lifetime_secs(), 3600);
    }

    #[test]
    fn test_mixed_case_keys_accepted() {
        let config = SrvConfig::from_yaml_str(
            "AUTHZ:\n  WebServer:\n    PORT: 8380\n    logLongFile: true\nchessMetaData:\n  mongodb:\n    dbName: chess\n",
        )
        .expect("parse mixed-case document");

        assert_eq!(config.authz.web_server.port, 8380);
        assert!(config.authz.web_server.log_long_file);
        assert_eq!(config.chess_meta_data.mongodb.db_name, "chess");
        assert!(config.ignored_keys.is_empty());
    }

    #[test]
    fn test_unknown_keys_reported() {
        let config = SrvConfig::from_yaml_str(
            "Authz:\n  WebServer:\n    Prot: 8380\nFrontend:\n  OAuth:\n    - Provider: github\n      Scopes: [email]\nBilling: {}\n",
        )
        .expect("parse document");

        assert_eq!(config.authz.web_server.port, 0);
        assert_eq!(
            config.ignored_keys,
            vec![
                "authz.webserver.prot".to_string(),
                "frontend.oauth[0].scopes".to_string(),
                "billing".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_sections_default() {
        let config = SrvConfig::from_yaml_str("Authz:\n  TokenExpires: 10\n").expect("parse");

        assert_eq!(config.authz.token_expires, 10);
        assert_eq!(config.frontend, Frontend::default());
        assert_eq!(config.meta_data.web_server.port, 0);
        assert!(config.kerberos.realm.is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(SrvConfig::from_yaml_str("").expect("parse"), SrvConfig::default());
        assert_eq!(
            SrvConfig::from_yaml_str("  \n").expect("parse"),
            SrvConfig::default()
        );
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result = SrvConfig::from_yaml_str("Authz:\n  TokenExpires: soon\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write config");

        let config = SrvConfig::from_file(file.path()).expect("load config");
        assert_eq!(config.authz.web_server.port, 8380);

        let loaded = SrvConfig::load(Some(file.path())).expect("load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.yaml");

        let result = SrvConfig::from_file(&path);

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(b"Authz: [unclosed").expect("write config");

        let result = SrvConfig::from_file(file.path());

        match result {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_token_settings_prefers_authz_secret() {
        let config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");
        let settings = config.token_settings().expect("token settings");

        assert_eq!(settings.secret(), b"authz-secret");
        assert_eq!(settings.lifetime_secs(), 3600);
    }

    #[test]
    fn test_token_settings_falls_back_to_global_secret() {
        let mut config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");
        config.authz.encryption.secret.clear();

        let settings = config.token_settings().expect("token settings");

        assert_eq!(settings.secret(), b"global-secret");
    }

    #[test]
    fn test_token_settings_empty_secret() {
        let config = SrvConfig::from_yaml_str("Authz:\n  TokenExpires: 10\n").expect("parse");

        let result = config.token_settings();

        match result {
            Err(ConfigError::InvalidValue { name, .. }) => assert_eq!(name, "Encryption.Secret"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_token_settings_zero_lifetime() {
        let config =
            SrvConfig::from_yaml_str("Encryption:\n  Secret: s\n").expect("parse");

        let result = config.token_settings();

        match result {
            Err(ConfigError::InvalidValue { name, .. }) => assert_eq!(name, "Authz.TokenExpires"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_web_server_selection() {
        let config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");

        assert_eq!(config.web_server(ServiceKind::Frontend).port, 8344);
        assert_eq!(config.web_server(ServiceKind::Authz).port, 8380);
        assert_eq!(config.web_server(ServiceKind::ChessMetaData).port, 8300);
        assert_eq!(config.web_server(ServiceKind::Discovery).port, 0);
    }

    #[test]
    fn test_service_kind_parse() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.name().parse::<ServiceKind>(), Ok(kind));
        }
        assert_eq!("Authz".parse::<ServiceKind>(), Ok(ServiceKind::Authz));
        assert_eq!(
            "billing".parse::<ServiceKind>(),
            Err(UnknownServiceError("billing".to_string()))
        );
    }

    #[test]
    fn test_encryption_debug_redacts_secret() {
        let config = SrvConfig::from_yaml_str(SAMPLE).expect("parse sample");
        let debug = format!("{config:?}");

        assert!(!debug.contains("authz-secret"));
        assert!(!debug.contains("global-secret"));
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Read {
            path: PathBuf::from("/etc/srv.yaml"),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "fail to read /etc/srv.yaml file, error No such file or directory"
        );

        let error = ConfigError::InvalidValue {
            name: "Authz.TokenExpires".to_string(),
            message: "bad value".to_string(),
        };
        assert_eq!(error.to_string(), "invalid value for Authz.TokenExpires: bad value");
        assert_eq!(
            ConfigError::MissingHome.to_string(),
            "no config file given and HOME is not set"
        );
    }
}
