use crate::api::{
    self,
    email::LogMailer,
    handlers::auth::{AuthConfig, AuthState},
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;

/// Fully-resolved server configuration from the CLI.
#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub access_token_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub verify_email_ttl_seconds: i64,
    pub admin_register_ttl_seconds: i64,
    pub frontend_base_url: String,
}

/// Handle the server action
pub async fn handle(args: Args) -> Result<()> {
    let config = AuthConfig::new(args.jwt_secret, args.frontend_base_url)
        .with_access_token_ttl_seconds(args.access_token_ttl_seconds)
        .with_refresh_ttl_seconds(args.refresh_ttl_seconds)
        .with_verify_email_ttl_seconds(args.verify_email_ttl_seconds)
        .with_admin_register_ttl_seconds(args.admin_register_ttl_seconds);

    let auth_state = Arc::new(AuthState::new(config, Arc::new(LogMailer)));

    api::new(args.port, args.dsn, auth_state).await
}
