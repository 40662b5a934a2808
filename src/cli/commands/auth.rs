//! Auth-related command-line arguments: signing secret, token lifetimes, and
//! the frontend base URL used in verification links.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_ACCESS_TOKEN_TTL: &str = "access-token-ttl-seconds";
pub const ARG_REFRESH_TTL: &str = "refresh-ttl-seconds";
pub const ARG_VERIFY_EMAIL_TTL: &str = "verify-email-ttl-seconds";
pub const ARG_ADMIN_REGISTER_TTL: &str = "admin-register-ttl-seconds";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

/// Typed view of the auth arguments after clap validation.
#[derive(Debug, Clone)]
pub struct Options {
    pub jwt_secret: SecretString,
    pub access_token_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub verify_email_ttl_seconds: i64,
    pub admin_register_ttl_seconds: i64,
    pub frontend_base_url: String,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .cloned()
            .context("missing required argument: --jwt-secret")?;

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            access_token_ttl_seconds: matches
                .get_one::<i64>(ARG_ACCESS_TOKEN_TTL)
                .copied()
                .unwrap_or(900),
            refresh_ttl_seconds: matches
                .get_one::<i64>(ARG_REFRESH_TTL)
                .copied()
                .unwrap_or(30 * 24 * 60 * 60),
            verify_email_ttl_seconds: matches
                .get_one::<i64>(ARG_VERIFY_EMAIL_TTL)
                .copied()
                .unwrap_or(1800),
            admin_register_ttl_seconds: matches
                .get_one::<i64>(ARG_ADMIN_REGISTER_TTL)
                .copied()
                .unwrap_or(7 * 24 * 60 * 60),
            frontend_base_url: matches
                .get_one::<String>(ARG_FRONTEND_BASE_URL)
                .cloned()
                .unwrap_or_else(|| "https://gardi.dev".to_string()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("HMAC secret used to sign and verify access tokens")
                .env("GARDI_JWT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN_TTL)
                .long(ARG_ACCESS_TOKEN_TTL)
                .help("Access token TTL in seconds")
                .env("GARDI_ACCESS_TOKEN_TTL_SECONDS")
                .default_value("900")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_REFRESH_TTL)
                .long(ARG_REFRESH_TTL)
                .help("Refresh session lifetime in seconds, for both login and rotation")
                .env("GARDI_REFRESH_TTL_SECONDS")
                .default_value("2592000")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_VERIFY_EMAIL_TTL)
                .long(ARG_VERIFY_EMAIL_TTL)
                .help("Email verification token TTL in seconds")
                .env("GARDI_VERIFY_EMAIL_TTL_SECONDS")
                .default_value("1800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_ADMIN_REGISTER_TTL)
                .long(ARG_ADMIN_REGISTER_TTL)
                .help("Admin-assisted registration token TTL in seconds")
                .env("GARDI_ADMIN_REGISTER_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL used for verification links and CORS")
                .env("GARDI_FRONTEND_BASE_URL")
                .default_value("https://gardi.dev"),
        )
}
