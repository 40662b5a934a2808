//! Postgres access for credentials, sessions and verification tokens.
//!
//! Every helper wraps its statement in a `db.query` span so traces carry the
//! statement text. Expiry is always computed server side against `NOW()` so
//! the application never compares wall clocks with the database.

use anyhow::{Context, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, PgPool, Postgres, Row, Transaction};
use tracing::{info_span, Instrument};

/// Credential material looked up at login time.
#[derive(Debug)]
pub(super) struct CredentialRow {
    pub user_id: String,
    /// `None` for accounts that never completed registration.
    pub password_hash: Option<String>,
    pub token_epoch: String,
    pub email_verified: bool,
}

/// Live epoch and verification flag for a user.
#[derive(Debug)]
pub(super) struct EpochRow {
    pub token_epoch: String,
    pub email_verified: bool,
}

/// A refresh session to insert.
#[derive(Debug)]
pub(super) struct NewSession {
    pub id: String,
    pub user_id: String,
    pub refresh_token_hash: Vec<u8>,
    pub device_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub ttl_seconds: i64,
}

/// A refresh session as stored, with expiry resolved by the database.
#[derive(Debug)]
pub(super) struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub revoked: bool,
    pub expired: bool,
}

/// A verification token to insert.
#[derive(Debug)]
pub(super) struct NewVerificationToken {
    pub id: String,
    pub user_id: String,
    pub token_hash: Vec<u8>,
    pub action_type: String,
    pub ttl_seconds: i64,
}

/// A verification token as stored, with expiry resolved by the database.
#[derive(Debug)]
pub(super) struct VerificationRow {
    pub id: String,
    pub user_id: String,
    pub action_type: String,
    pub is_used: bool,
    pub expired: bool,
}

/// Find credential material by username or email.
pub(super) async fn lookup_credentials(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<CredentialRow>> {
    let query = "SELECT id, password_hash, token_epoch, email_verified \
                 FROM users WHERE username = $1 OR email = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(identifier)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("Failed to look up credentials")?;

    row.map(|row| {
        Ok(CredentialRow {
            user_id: row.try_get("id")?,
            password_hash: row.try_get("password_hash")?,
            token_epoch: row.try_get("token_epoch")?,
            email_verified: row.try_get("email_verified")?,
        })
    })
    .transpose()
}

/// Role names attached to a user, ordered for stable output.
pub(super) async fn fetch_user_roles(
    executor: impl PgExecutor<'_>,
    user_id: &str,
) -> Result<Vec<String>> {
    let query = "SELECT r.name FROM roles r \
                 JOIN user_roles ur ON ur.role_id = r.id \
                 WHERE ur.user_id = $1 ORDER BY r.name";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(executor)
        .instrument(span)
        .await
        .context("Failed to fetch user roles")?;

    rows.into_iter()
        .map(|row: PgRow| row.try_get::<String, _>("name").map_err(Into::into))
        .collect()
}

/// Live epoch record for a user, `None` when the user no longer exists.
pub(super) async fn epoch_record(
    executor: impl PgExecutor<'_>,
    user_id: &str,
) -> Result<Option<EpochRow>> {
    let query = "SELECT token_epoch, email_verified FROM users WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(executor)
        .instrument(span)
        .await
        .context("Failed to fetch token epoch")?;

    row.map(|row| {
        Ok(EpochRow {
            token_epoch: row.try_get("token_epoch")?,
            email_verified: row.try_get("email_verified")?,
        })
    })
    .transpose()
}

/// Email address on file for a user.
pub(super) async fn lookup_user_email(pool: &PgPool, user_id: &str) -> Result<Option<String>> {
    let query = "SELECT email FROM users WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("Failed to fetch user email")?;

    row.map(|row| row.try_get("email").map_err(Into::into))
        .transpose()
}

/// Replace the user's token epoch, invalidating every outstanding access token.
pub(super) async fn bump_epoch(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    new_epoch: &str,
) -> Result<()> {
    let query = "UPDATE users SET token_epoch = $2 WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(new_epoch)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to rotate token epoch")?;
    Ok(())
}

/// Insert a refresh session. Expiry is anchored to the database clock.
pub(super) async fn insert_session(
    tx: &mut Transaction<'_, Postgres>,
    session: &NewSession,
) -> Result<()> {
    let query = "INSERT INTO sessions \
                 (id, user_id, refresh_token_hash, device_id, ip_address, user_agent, expires_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, NOW() + ($7 * INTERVAL '1 second'))";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(session.device_id.as_deref())
        .bind(session.ip_address.as_deref())
        .bind(session.user_agent.as_deref())
        .bind(session.ttl_seconds)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to insert session")?;
    Ok(())
}

/// Find a session by the hash of its refresh secret.
pub(super) async fn lookup_session_by_hash(
    executor: impl PgExecutor<'_>,
    refresh_token_hash: &[u8],
) -> Result<Option<SessionRow>> {
    let query = "SELECT id, user_id, revoked, expires_at <= NOW() AS expired \
                 FROM sessions WHERE refresh_token_hash = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(refresh_token_hash)
        .fetch_optional(executor)
        .instrument(span)
        .await
        .context("Failed to look up session")?;

    row.map(|row| {
        Ok(SessionRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            revoked: row.try_get("revoked")?,
            expired: row.try_get("expired")?,
        })
    })
    .transpose()
}

/// Revoke a session only if it was still active, returning whether this
/// caller won the claim. Concurrent rotations of the same secret race here
/// and exactly one sees `true`.
pub(super) async fn claim_session(
    tx: &mut Transaction<'_, Postgres>,
    session_id: &str,
) -> Result<bool> {
    let query = "UPDATE sessions SET revoked = TRUE \
                 WHERE id = $1 AND revoked = FALSE RETURNING id";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(session_id)
        .fetch_optional(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to claim session")?;
    Ok(row.is_some())
}

/// Revoke a single session. Idempotent.
pub(super) async fn revoke_session(pool: &PgPool, session_id: &str) -> Result<()> {
    let query = "UPDATE sessions SET revoked = TRUE WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(session_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("Failed to revoke session")?;
    Ok(())
}

/// Revoke every session belonging to a user.
pub(super) async fn revoke_all_sessions(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
) -> Result<()> {
    let query = "UPDATE sessions SET revoked = TRUE WHERE user_id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to revoke user sessions")?;
    Ok(())
}

/// Insert a verification token row.
pub(super) async fn insert_verification_token(
    executor: impl PgExecutor<'_>,
    token: &NewVerificationToken,
) -> Result<()> {
    let query = "INSERT INTO verification_tokens \
                 (id, user_id, token_hash, action_type, expires_at) \
                 VALUES ($1, $2, $3, $4, NOW() + ($5 * INTERVAL '1 second'))";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(&token.id)
        .bind(&token.user_id)
        .bind(&token.token_hash)
        .bind(&token.action_type)
        .bind(token.ttl_seconds)
        .execute(executor)
        .instrument(span)
        .await
        .context("Failed to insert verification token")?;
    Ok(())
}

/// Find a verification token by the hash of its secret.
pub(super) async fn lookup_verification_token(
    executor: impl PgExecutor<'_>,
    token_hash: &[u8],
) -> Result<Option<VerificationRow>> {
    let query = "SELECT id, user_id, action_type, is_used, expires_at <= NOW() AS expired \
                 FROM verification_tokens WHERE token_hash = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(executor)
        .instrument(span)
        .await
        .context("Failed to look up verification token")?;

    row.map(|row| {
        Ok(VerificationRow {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            action_type: row.try_get("action_type")?,
            is_used: row.try_get("is_used")?,
            expired: row.try_get("expired")?,
        })
    })
    .transpose()
}

/// Mark a verification token used only if it was still unused, returning
/// whether this caller consumed it. Concurrent submissions race here and
/// exactly one sees `true`.
pub(super) async fn consume_verification_token(
    tx: &mut Transaction<'_, Postgres>,
    token_id: &str,
) -> Result<bool> {
    let query = "UPDATE verification_tokens SET is_used = TRUE \
                 WHERE id = $1 AND is_used = FALSE RETURNING id";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_id)
        .fetch_optional(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to consume verification token")?;
    Ok(row.is_some())
}

/// Flip the user's email to verified.
pub(super) async fn mark_email_verified(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
) -> Result<()> {
    let query = "UPDATE users SET email_verified = TRUE WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("Failed to mark email verified")?;
    Ok(())
}

/// Result of [`finalize_admin_registration`].
#[derive(Debug, PartialEq, Eq)]
pub(super) enum FinalizeOutcome {
    Completed,
    /// The chosen username hit the unique constraint on `users.username`.
    UsernameTaken,
}

/// Finish an invited admin's registration: set their chosen username and
/// password and mark the email verified in one statement. A unique-violation
/// on the username is reported as an outcome, not an error; the enclosing
/// transaction is poisoned at that point and must be rolled back.
pub(super) async fn finalize_admin_registration(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    username: &str,
    password_hash: &str,
) -> Result<FinalizeOutcome> {
    let query = "UPDATE users SET username = $2, password_hash = $3, email_verified = TRUE \
                 WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    match sqlx::query(query)
        .bind(user_id)
        .bind(username)
        .bind(password_hash)
        .execute(&mut **tx)
        .instrument(span)
        .await
    {
        Ok(_) => Ok(FinalizeOutcome::Completed),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            Ok(FinalizeOutcome::UsernameTaken)
        }
        Err(err) => Err(err).context("Failed to finalize admin registration"),
    }
}
