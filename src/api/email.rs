//! Outbound mail boundary.
//!
//! Verification flows persist their token row first and then hand the message
//! to a [`Mailer`]. Delivery failures surface to the caller (fail loud); the
//! already-persisted token stays valid so a resend can reuse it.
//!
//! The default implementation for local development is [`LogMailer`], which
//! logs the message instead of delivering it. Real SMTP/API delivery plugs in
//! behind the same trait.

use anyhow::Result;
use tracing::info;

/// Mail delivery abstraction.
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error.
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Local dev mailer that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        info!(to_email = %to, subject = %subject, body_bytes = body.len(), "mail send stub");
        Ok(())
    }
}

/// Build the verification link included in outbound emails.
#[must_use]
pub fn build_verify_url(frontend_base_url: &str, path: &str, token: &str) -> String {
    let base = frontend_base_url.trim_end_matches('/');
    format!("{base}/{path}#token={token}")
}

/// Subject and HTML body for a self-service email verification message.
#[must_use]
pub fn verify_email_message(frontend_base_url: &str, token: &str) -> (String, String) {
    let url = build_verify_url(frontend_base_url, "verify-email", token);
    let body = format!(
        "<h2>Verify your email</h2>\
         <p>Follow the link below to confirm your email address:</p>\
         <p><a href='{url}'>Verify email</a></p>\
         <p>If the link does not work, copy this URL into your browser:</p>\
         <p><code>{url}</code></p>"
    );
    ("Verify your email".to_string(), body)
}

/// Subject and HTML body for an admin-assisted registration completion message.
#[must_use]
pub fn admin_register_message(frontend_base_url: &str, token: &str) -> (String, String) {
    let url = build_verify_url(frontend_base_url, "complete-registration", token);
    let body = format!(
        "<h2>Finish setting up your account</h2>\
         <p>An administrator created an account for you. Choose a username and \
         password using the link below:</p>\
         <p><a href='{url}'>Complete registration</a></p>\
         <p>If the link does not work, copy this URL into your browser:</p>\
         <p><code>{url}</code></p>"
    );
    ("Complete your registration".to_string(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_verify_url_trims_trailing_slash() {
        let url = build_verify_url("https://gardi.dev/", "verify-email", "token");
        assert_eq!(url, "https://gardi.dev/verify-email#token=token");
    }

    #[test]
    fn verify_email_message_embeds_token() {
        let (subject, body) = verify_email_message("https://gardi.dev", "tok123");
        assert_eq!(subject, "Verify your email");
        assert!(body.contains("https://gardi.dev/verify-email#token=tok123"));
    }

    #[test]
    fn admin_register_message_uses_completion_path() {
        let (subject, body) = admin_register_message("https://gardi.dev", "tok456");
        assert_eq!(subject, "Complete your registration");
        assert!(body.contains("https://gardi.dev/complete-registration#token=tok456"));
    }

    #[test]
    fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        assert!(mailer.send("alice@example.com", "subject", "body").is_ok());
    }
}
