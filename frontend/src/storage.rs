// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Durable key/value storage backing the session.
//!
//! A single `session` table plays the part browser local storage plays for
//! a web client: a handful of string keys that outlive the process.

use std::time::Duration;

use anyhow::{Context, Result};
use common::Identity;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::{debug, info};

const IDENTITY_KEY: &str = "identity";

/// Establishes the session database pool.
/// If the database does not exist, it creates it.
/// It also ensures the `session` table exists.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !database_url.contains(":memory:")
        && !Sqlite::database_exists(database_url).await.unwrap_or(false)
    {
        info!("Creating session database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create session database")?;
    }

    // One connection: an in-memory database only lives as long as its
    // connection, and the session is never written concurrently anyway.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect(database_url)
        .await
        .context("Failed to connect to session database")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS session (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await
    .context("Failed to create 'session' table")?;

    debug!("'session' table is ready.");

    Ok(pool)
}

async fn put(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO session (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to store session key '{key}'"))?;
    Ok(())
}

async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM session WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to read session key '{key}'"))?;
    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Persists the identity, replacing any previous one.
pub async fn save_identity(pool: &SqlitePool, identity: &Identity) -> Result<()> {
    let encoded = serde_json::to_string(identity).context("Failed to encode identity")?;
    put(pool, IDENTITY_KEY, &encoded).await?;
    debug!("Stored identity for employee {}", identity.id);
    Ok(())
}

/// Loads the stored identity, if any. A record that no longer decodes is
/// treated as absent.
pub async fn load_identity(pool: &SqlitePool) -> Result<Option<Identity>> {
    let Some(raw) = get(pool, IDENTITY_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str::<Identity>(&raw) {
        Ok(identity) => Ok(Some(identity)),
        Err(e) => {
            tracing::warn!("Discarding unreadable stored identity: {}", e);
            Ok(None)
        }
    }
}

/// Removes everything the session stored.
pub async fn clear(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM session")
        .execute(pool)
        .await
        .context("Failed to clear session")?;
    info!("Cleared {} session entries.", result.rows_affected());
    Ok(result.rows_affected())
}
