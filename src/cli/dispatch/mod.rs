//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::auth;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret: auth_opts.jwt_secret,
        access_token_ttl_seconds: auth_opts.access_token_ttl_seconds,
        refresh_ttl_seconds: auth_opts.refresh_ttl_seconds,
        verify_email_ttl_seconds: auth_opts.verify_email_ttl_seconds,
        admin_register_ttl_seconds: auth_opts.admin_register_ttl_seconds,
        frontend_base_url: auth_opts.frontend_base_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn dispatch_builds_server_action() {
        temp_env::with_vars([("GARDI_JWT_SECRET", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "gardi",
                "--dsn",
                "postgres://localhost/gardi",
                "--jwt-secret",
                "secret",
                "--refresh-ttl-seconds",
                "86400",
            ]);

            let action = handler(&matches).expect("dispatch should succeed");
            let Action::Server(args) = action;
            assert_eq!(args.port, 8080);
            assert_eq!(args.dsn, "postgres://localhost/gardi");
            assert_eq!(args.jwt_secret.expose_secret(), "secret");
            assert_eq!(args.refresh_ttl_seconds, 86_400);
            assert_eq!(args.access_token_ttl_seconds, 900);
        });
    }
}
