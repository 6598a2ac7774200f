//! # Shorthands Configuration
//!
//! CLI-first configuration for the Shorthands API. Uses `clap::Parser` for
//! argument parsing with environment variable fallbacks, and `bon::Builder`
//! for ergonomic test construction without CLI/env interference.
//!
//! ```no_run
//! use shorthands_config::{Cli, Config};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.config;
//! config.validate().expect("invalid configuration");
//! ```
//!
//! ```no_run
//! use shorthands_config::Config;
//!
//! let config = Config::builder()
//!     .jwt_secret("test-secret")
//!     .build();
//! ```

#![deny(unsafe_code)]

use std::net::SocketAddr;

use bon::Builder;
use clap::Parser;
use shorthands_types::error::{Error, Result};

/// Default HTTP listen address.
const DEFAULT_LISTEN: &str = "127.0.0.1:3900";

/// Default log level filter string.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default auth token lifetime in hours.
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Maximum valid Snowflake worker ID (10 bits).
const MAX_WORKER_ID: u16 = 1023;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Automatically detect: JSON for non-TTY stdout, text otherwise.
    #[default]
    Auto,
    /// JSON structured logging (recommended for production).
    Json,
    /// Human-readable text format.
    Text,
}

/// Command-line interface for the Shorthands API server.
#[derive(Debug, Parser)]
#[command(name = "shorthands")]
#[command(version)]
pub struct Cli {
    /// Server configuration (flattened so flags appear at top level).
    #[command(flatten)]
    pub config: Config,
}

/// Configuration for the Shorthands API server.
///
/// All fields are configurable via CLI flags or environment variables.
/// Precedence: CLI arg > env var > default value.
///
/// `jwt_secret` uses `hide_env_values` to prevent leaking the secret in
/// `--help` output.
#[derive(Debug, Clone, Builder, Parser)]
#[command(name = "shorthands")]
#[command(version)]
#[builder(on(String, into))]
pub struct Config {
    // ── Server ───────────────────────────────────────────────────────
    /// HTTP bind address.
    #[arg(long = "listen", env = "SHORTHANDS__LISTEN", default_value = DEFAULT_LISTEN)]
    #[builder(default = default_listen())]
    pub listen: SocketAddr,

    /// Tracing-subscriber filter string (e.g., info, debug, trace).
    #[arg(long = "log-level", env = "SHORTHANDS__LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    #[builder(default = DEFAULT_LOG_LEVEL.to_string())]
    pub log_level: String,

    /// Log output format: auto, json, or text.
    #[arg(
        long = "log-format",
        env = "SHORTHANDS__LOG_FORMAT",
        value_enum,
        default_value = "auto"
    )]
    #[builder(default)]
    pub log_format: LogFormat,

    // ── Authentication ───────────────────────────────────────────────
    /// HMAC secret for signing auth tokens. Required.
    #[arg(
        long = "jwt-secret",
        env = "SHORTHANDS__JWT_SECRET",
        hide_env_values = true,
        default_value = ""
    )]
    #[builder(default)]
    pub jwt_secret: String,

    /// Auth token lifetime in hours.
    #[arg(long = "token-ttl-hours", env = "SHORTHANDS__TOKEN_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    #[builder(default = DEFAULT_TOKEN_TTL_HOURS)]
    pub token_ttl_hours: i64,

    // ── Identity ─────────────────────────────────────────────────────
    /// Snowflake worker ID for this instance (0-1023).
    #[arg(long = "worker-id", env = "SHORTHANDS__WORKER_ID", default_value_t = 0)]
    #[builder(default = 0)]
    pub worker_id: u16,
}

fn default_listen() -> SocketAddr {
    #[allow(clippy::expect_used)]
    DEFAULT_LISTEN.parse().expect("valid default listen address")
}

impl Config {
    /// Validate cross-field business rules.
    ///
    /// Must be called after parsing and before using the config.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(Error::config(
                "--jwt-secret (or SHORTHANDS__JWT_SECRET) is required and must not be empty",
            ));
        }

        if self.token_ttl_hours < 1 {
            return Err(Error::config("--token-ttl-hours must be at least 1"));
        }

        if self.worker_id > MAX_WORKER_ID {
            return Err(Error::config(format!(
                "--worker-id must be between 0 and {MAX_WORKER_ID}, got {}",
                self.worker_id
            )));
        }

        Ok(())
    }
}
