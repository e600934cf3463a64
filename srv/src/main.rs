#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code; a bad config must exit cleanly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use srv::auth::{TokenAuthority, TokenError};
use srv::config::{ServiceKind, SrvConfig};
use srv::logging::init_logging;
use srv::time::{SystemTimeSource, TimeSource};

/// Configuration, logging, and access token tool for the srv services.
#[derive(Debug, Parser)]
#[command(name = "srv", disable_version_flag = true)]
struct Cli {
    /// Server config file (default: $HOME/.srv.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service whose WebServer block configures logging.
    #[arg(long, global = true, default_value = "authz")]
    service: ServiceKind,

    /// Show version.
    #[arg(long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the config, start logging, and report the selected service.
    Check,
    /// Issue an access token and print its envelope as JSON.
    Issue {
        /// Scope granted by the token.
        #[arg(long)]
        scope: String,
        /// Absolute expiry in Unix seconds (default: now + Authz.TokenExpires).
        #[arg(long)]
        expires_at: Option<i64>,
    },
    /// Verify an access token and print its claims as JSON.
    Verify {
        /// The encoded token.
        token: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("srv version: {}", srv::build_info());
        return ExitCode::SUCCESS;
    }

    let config = match SrvConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR {e}");
            return ExitCode::FAILURE;
        }
    };

    let web_server = config.web_server(cli.service);
    let _log_guard = match init_logging(web_server) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ERROR {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("srv {} service={}", srv::build_info(), cli.service);
    for key in &config.ignored_keys {
        tracing::warn!("ignoring unknown config key {key}");
    }

    match run(&config, cli.service, cli.command.unwrap_or(Command::Check)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &SrvConfig, service: ServiceKind, command: Command) -> Result<(), String> {
    match command {
        Command::Check => {
            let web_server = config.web_server(service);
            tracing::info!(
                "Loaded configuration: service={service}, port={}, base={:?}, log_file={:?}",
                web_server.port,
                web_server.base,
                web_server.log_file
            );
            match config.token_settings() {
                Ok(settings) => tracing::info!(
                    "access tokens enabled, lifetime={}s",
                    settings.lifetime_secs()
                ),
                Err(e) => tracing::warn!("access tokens disabled: {e}"),
            }
            Ok(())
        }
        Command::Issue { scope, expires_at } => {
            let authority = TokenAuthority::new(config.token_settings().map_err(|e| e.to_string())?);
            let envelope = match expires_at {
                Some(expires_at) => authority.issue_until(&scope, expires_at),
                None => authority.issue(&scope),
            }
            .map_err(|e| e.to_string())?;
            let remaining = envelope.remaining_secs(SystemTimeSource.now_secs());
            if remaining == 0 {
                tracing::warn!("issued token for scope {scope} is already expired");
            } else {
                tracing::info!("issued token for scope {scope}, valid for {remaining}s");
            }
            let json = serde_json::to_string_pretty(&envelope).map_err(|e| e.to_string())?;
            println!("{json}");
            Ok(())
        }
        Command::Verify { token } => {
            let authority = TokenAuthority::new(config.token_settings().map_err(|e| e.to_string())?);
            let claims = authority.claims(&token).map_err(|e| verify_failure(&e))?;
            let json = serde_json::to_string_pretty(&claims).map_err(|e| e.to_string())?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Message for a failed `verify`: a rejected credential, or a fault.
fn verify_failure(error: &TokenError) -> String {
    if error.is_unauthenticated() {
        format!("token rejected: {error}")
    } else {
        format!("token check failed: {error}")
    }
}
