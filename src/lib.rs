//! # Gardi (Authentication & Session Lifecycle)
//!
//! `gardi` is the authentication core of a multi-tenant user-management
//! platform. It verifies credentials, mints short-lived signed access tokens,
//! tracks per-device refresh sessions, and manages single-use email
//! verification tokens.
//!
//! ## Access tokens & epochs
//!
//! Access tokens are stateless HS256 JWTs carrying the user id, role set,
//! email-verified flag, and the user's *token epoch* at issuance. The epoch is
//! an opaque per-user stamp stored in the database; every authorization check
//! re-reads it, so replacing the stamp invalidates every outstanding token at
//! once without per-token bookkeeping.
//!
//! ## Refresh sessions
//!
//! Refresh secrets are opaque random strings; only their SHA-256 hash is
//! persisted. Redeeming a secret is strictly one-time: the old session row is
//! revoked and a replacement row inserted inside a single transaction, so a
//! raced redemption produces exactly one winner and a crash can never leave
//! two live sessions behind one secret.
//!
//! ## Verification tokens
//!
//! Email-confirmation and admin-assisted registration completion are gated by
//! time-boxed, single-use tokens tagged with an action type. Consuming a token
//! and applying its effect happen in the same transaction.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
