// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::Identity;
use parking_lot::RwLock;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppResult;
use crate::storage;

/// The session context shared by every view.
///
/// Built once at startup and handed to views behind an `Arc`. Writes go to
/// the session database before the in-memory copy changes, so a successful
/// `set_identity` is durable.
pub struct Session {
    pool: SqlitePool,
    identity: RwLock<Option<Identity>>,
}

impl Session {
    /// Opens the session over `pool`, picking up any identity left by a
    /// previous run.
    pub async fn restore(pool: SqlitePool) -> AppResult<Self> {
        let identity = storage::load_identity(&pool).await?;
        if let Some(identity) = &identity {
            info!(
                "Restored session for employee {} ({})",
                identity.id, identity.role
            );
        }
        Ok(Self {
            pool,
            identity: RwLock::new(identity),
        })
    }

    pub async fn set_identity(&self, identity: Identity) -> AppResult<()> {
        storage::save_identity(&self.pool, &identity).await?;
        *self.identity.write() = Some(identity);
        Ok(())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    /// The logged-in employee's id, or `None` when nobody is logged in.
    pub fn employee_id(&self) -> Option<String> {
        self.identity.read().as_ref().map(|identity| identity.id.clone())
    }

    /// Forgets the identity, in memory and on disk.
    pub async fn logout(&self) -> AppResult<()> {
        storage::clear(&self.pool).await?;
        if let Some(identity) = self.identity.write().take() {
            info!("Employee {} logged out.", identity.id);
        }
        Ok(())
    }
}
