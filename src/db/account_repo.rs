//! Identity accounts: the email/password half of a member.

use anyhow::{bail, Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Account;

/// Hash off the async executor; bcrypt is deliberately slow.
async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .context("joining hash task")?
        .context("hashing password")
}

/// Create an account; fails with a readable message when the email is taken.
pub async fn create_account(db: &PgPool, email: &str, password: &str) -> Result<Uuid> {
    let hash = hash_password(password).await?;

    match sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(email)
    .bind(hash)
    .fetch_one(db)
    .await
    {
        Ok(id) => Ok(id),
        Err(sqlx::Error::Database(db_err)) if db_err.code() == Some("23505".into()) => {
            bail!("account already exists for {email}")
        }
        Err(e) => Err(e).context("creating account"),
    }
}

pub async fn delete_account(db: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("deleting account")?;
    Ok(())
}

/// Returns the account id when `password` matches the stored hash.
pub async fn verify_credentials(db: &PgPool, email: &str, password: &str) -> Result<Option<Uuid>> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, email, password_hash, created_at FROM accounts WHERE lower(email) = lower($1)",
    )
    .bind(email)
    .fetch_optional(db)
    .await
    .context("fetching account")?;

    let Some(account) = account else {
        return Ok(None);
    };

    let password = password.to_owned();
    let hash = account.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("joining verify task")?
        .context("verifying password")?;

    Ok(ok.then_some(account.id))
}
