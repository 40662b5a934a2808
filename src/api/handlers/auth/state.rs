//! Auth configuration and shared state.

use secrecy::SecretString;
use std::sync::Arc;

use crate::api::email::Mailer;

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_VERIFY_EMAIL_TTL_SECONDS: i64 = 30 * 60;
const DEFAULT_ADMIN_REGISTER_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    access_token_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    verify_email_ttl_seconds: i64,
    admin_register_ttl_seconds: i64,
    frontend_base_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString, frontend_base_url: String) -> Self {
        Self {
            jwt_secret,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            verify_email_ttl_seconds: DEFAULT_VERIFY_EMAIL_TTL_SECONDS,
            admin_register_ttl_seconds: DEFAULT_ADMIN_REGISTER_TTL_SECONDS,
            frontend_base_url,
        }
    }

    #[must_use]
    pub fn with_access_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_verify_email_ttl_seconds(mut self, seconds: i64) -> Self {
        self.verify_email_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_admin_register_ttl_seconds(mut self, seconds: i64) -> Self {
        self.admin_register_ttl_seconds = seconds;
        self
    }

    pub(crate) fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    pub(crate) fn access_token_ttl_seconds(&self) -> i64 {
        self.access_token_ttl_seconds
    }

    pub(crate) fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    pub(super) fn verify_email_ttl_seconds(&self) -> i64 {
        self.verify_email_ttl_seconds
    }

    pub(super) fn admin_register_ttl_seconds(&self) -> i64 {
        self.admin_register_ttl_seconds
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    // Cookies are only marked Secure when the frontend is served over HTTPS.
    pub(super) fn cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    mailer: Arc<dyn Mailer>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::email::LogMailer;

    fn config() -> AuthConfig {
        AuthConfig::new(
            SecretString::from("test-secret"),
            "https://gardi.dev".to_string(),
        )
    }

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = config();

        assert_eq!(config.frontend_base_url(), "https://gardi.dev");
        assert_eq!(
            config.access_token_ttl_seconds(),
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS
        );
        assert_eq!(config.refresh_ttl_seconds(), DEFAULT_REFRESH_TTL_SECONDS);
        assert_eq!(
            config.verify_email_ttl_seconds(),
            DEFAULT_VERIFY_EMAIL_TTL_SECONDS
        );
        assert_eq!(
            config.admin_register_ttl_seconds(),
            DEFAULT_ADMIN_REGISTER_TTL_SECONDS
        );
        assert!(config.cookie_secure());

        let config = config
            .with_access_token_ttl_seconds(60)
            .with_refresh_ttl_seconds(3600)
            .with_verify_email_ttl_seconds(120)
            .with_admin_register_ttl_seconds(240);

        assert_eq!(config.access_token_ttl_seconds(), 60);
        assert_eq!(config.refresh_ttl_seconds(), 3600);
        assert_eq!(config.verify_email_ttl_seconds(), 120);
        assert_eq!(config.admin_register_ttl_seconds(), 240);
    }

    #[test]
    fn cookie_secure_requires_https_frontend() {
        let config = AuthConfig::new(
            SecretString::from("test-secret"),
            "http://localhost:3000".to_string(),
        );
        assert!(!config.cookie_secure());
    }

    #[test]
    fn auth_state_exposes_config() {
        let state = AuthState::new(config(), Arc::new(LogMailer));
        assert_eq!(state.config().frontend_base_url(), "https://gardi.dev");
        assert!(state.mailer().send("a@b.co", "s", "b").is_ok());
    }
}
