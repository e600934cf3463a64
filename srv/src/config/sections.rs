//! Configuration sections.
//!
//! Each service block owns its sub-blocks by name. Keys are matched
//! case-insensitively: the loader lowercases every YAML key first, so the
//! names here are the lowercase forms of the PascalCase keys used in the
//! shared config file (`TokenExpires` -> `tokenexpires`).
//! Absent keys take the type's zero value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Console presentation options for a web server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct WebServerOptions {
    /// Whether console log output uses ANSI colors.
    #[serde(rename = "colorconsole")]
    pub color_console: bool,
}

/// Options common to every web service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct WebServer {
    #[serde(rename = "ginoptions")]
    pub options: WebServerOptions,

    // basic options
    pub port: u16,
    /// Verbosity: 0 is info, 1 is debug, 2 and above is trace.
    pub verbose: u8,
    /// Base URL path.
    pub base: String,
    #[serde(rename = "staticdir")]
    pub static_dir: String,
    /// Log file prefix; empty means log to stdout.
    #[serde(rename = "logfile")]
    pub log_file: String,
    /// Include source file and line in every log record.
    #[serde(rename = "loglongfile")]
    pub log_long_file: bool,

    // middleware
    #[serde(rename = "rate")]
    pub limiter_period: String,

    // proxy
    #[serde(rename = "x-forwarded-host")]
    pub x_forwarded_host: String,
    #[serde(rename = "x-content-type-options")]
    pub x_content_type_options: String,

    // TLS
    #[serde(rename = "rootcas")]
    pub root_cas: String,
    #[serde(rename = "servercert")]
    pub server_crt: String,
    #[serde(rename = "serverkey")]
    pub server_key: String,
    /// `LetsEncrypt` domain names.
    #[serde(rename = "domainnames")]
    pub domain_names: Vec<String>,
}

/// Credentials for one OAuth provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct OAuthRecord {
    pub provider: String,
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "clientsecret")]
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Kerberos {
    #[serde(rename = "krb5conf")]
    pub krb5_conf: String,
    pub keytab: String,
    pub realm: String,
}

/// Encryption settings. `secret` signs access tokens.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Encryption {
    pub secret: String,
    pub cipher: String,
}

impl std::fmt::Debug for Encryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encryption")
            .field("secret", &"<redacted>")
            .field("cipher", &self.cipher)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoDb {
    #[serde(rename = "dbname")]
    pub db_name: String,
    #[serde(rename = "dbcoll")]
    pub db_coll: String,
    #[serde(rename = "dburi")]
    pub db_uri: String,
}

/// Frontend service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Frontend {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,

    pub oauth: Vec<OAuthRecord>,

    // captcha
    #[serde(rename = "captchasecretkey")]
    pub captcha_secret_key: String,
    #[serde(rename = "captchapublickey")]
    pub captcha_public_key: String,
    #[serde(rename = "captchaverifyurl")]
    pub captcha_verify_url: String,

    /// User cookie lifetime in seconds.
    #[serde(rename = "usercookieexpires")]
    pub user_cookie_expires: i64,

    #[serde(rename = "testmode")]
    pub test_mode: bool,
}

/// Discovery service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Discovery {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
    pub mongodb: MongoDb,
    pub encryption: Encryption,
}

/// Metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct MetaData {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
    pub mongodb: MongoDb,
}

/// CHESS metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct ChessMetaData {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
    pub mongodb: MongoDb,
    #[serde(rename = "testmode")]
    pub test_mode: bool,
    #[serde(rename = "schemafiles")]
    pub schema_files: Vec<String>,
    /// Schema reload interval in seconds.
    #[serde(rename = "schemarenewinterval")]
    pub schema_renew_interval: u64,
    /// Logical schema sections, in display order.
    #[serde(rename = "schemasections")]
    pub schema_sections: Vec<String>,
    /// Key order per web section.
    #[serde(rename = "websectionkeys")]
    pub web_section_keys: BTreeMap<String, Vec<String>>,
}

/// `OreCast` metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct OreCastMetaData {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
    pub mongodb: MongoDb,
}

/// Data-management service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct DataManagement {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
}

/// Data-bookkeeping service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct DataBookkeeping {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,

    /// Database file holding connection secrets.
    #[serde(rename = "dbfile")]
    pub db_file: String,
    #[serde(rename = "maxdbconnections")]
    pub max_db_connections: u32,
    #[serde(rename = "maxidleconnections")]
    pub max_idle_connections: u32,
}

/// Authorization service. Issues the access tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Authz {
    #[serde(rename = "webserver")]
    pub web_server: WebServer,
    pub encryption: Encryption,

    #[serde(rename = "testmode")]
    pub test_mode: bool,
    #[serde(rename = "dburi")]
    pub db_uri: String,
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "clientsecret")]
    pub client_secret: String,
    pub domain: String,
    /// Access token lifetime in seconds.
    #[serde(rename = "tokenexpires")]
    pub token_expires: i64,
}

/// Base URLs of the sibling services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "lowercase")]
pub struct Services {
    #[serde(rename = "frontendurl")]
    pub frontend_url: String,
    #[serde(rename = "discoveryurl")]
    pub discovery_url: String,
    #[serde(rename = "metadataurl")]
    pub meta_data_url: String,
    #[serde(rename = "datamanagementurl")]
    pub data_management_url: String,
    #[serde(rename = "databookkeepingurl")]
    pub data_bookkeeping_url: String,
    #[serde(rename = "authzurl")]
    pub authz_url: String,
}
