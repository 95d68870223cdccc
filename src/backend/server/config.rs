//! Server Configuration
//!
//! All process configuration is resolved here, once, at startup. Handlers
//! never read the environment; they see the `Config` carried in `AppState`.
//!
//! Required variables: `DATABASE_URL`, `JWT_SECRET`. Everything else has a
//! local-development default. SMTP is optional: without it the server runs
//! and password-reset codes are logged instead of emailed.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// SMTP credentials for outbound mail (password-reset codes).
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// From address, e.g. `Forkfeed <no-reply@forkfeed.app>`.
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Root directory for stored files; `uploads/` and `avatars/` live under it.
    pub upload_dir: PathBuf,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load configuration from the environment. Call once in `main` (after
    /// `dotenv`); everything downstream borrows the resulting struct.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidVar {
                name: "SERVER_PORT",
                value: raw,
            })?,
            Err(_) => 3000,
        };

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let smtp = Self::smtp_from_env();
        if smtp.is_none() {
            tracing::warn!("SMTP not configured; reset codes will be logged, not emailed");
        }

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            upload_dir,
            smtp,
        })
    }

    fn smtp_from_env() -> Option<SmtpConfig> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let username = std::env::var("SMTP_USERNAME").ok()?;
        let password = std::env::var("SMTP_PASSWORD").ok()?;
        let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone());

        Some(SmtpConfig {
            host,
            username,
            password,
            from,
        })
    }
}
