//! Postgres user repository implementation.
//!
//! Documents live in a single table: a UUID primary key and a JSONB body.
//! Partial updates use the JSONB concatenation operator, so untouched
//! fields survive an update untouched.

use crate::{pool::DatabasePoolInterface, traits::UserRepository};
use async_trait::async_trait;
use roster_core::{
    validate_fields, FieldMap, RosterError, RosterResult, UserDocument, UserId,
};
use serde_json::Value;
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Postgres user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PgUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserRepository {
    /// Creates a new Postgres user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user document.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    doc: Value,
}

impl TryFrom<UserRow> for UserDocument {
    type Error = RosterError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        match row.doc {
            Value::Object(fields) => Ok(UserDocument::new(UserId::from_uuid(row.id), fields)),
            other => Err(RosterError::internal(format!(
                "Non-object document in store for id {}: {}",
                row.id, other
            ))),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> RosterResult<Vec<UserDocument>> {
        debug!("Listing all user documents");

        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, doc FROM users ORDER BY id",
        )
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(UserDocument::try_from).collect()
    }

    async fn insert(&self, fields: FieldMap) -> RosterResult<UserDocument> {
        validate_fields(&fields)?;

        let id = UserId::new();
        debug!("Inserting user document: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, doc) VALUES ($1, $2) RETURNING id, doc",
        )
        .bind(id.into_inner())
        .bind(Value::Object(fields))
        .fetch_one(self.pool.inner())
        .await?;

        UserDocument::try_from(row)
    }

    async fn update_by_id(
        &self,
        id: UserId,
        fields: FieldMap,
    ) -> RosterResult<Option<UserDocument>> {
        validate_fields(&fields)?;

        debug!("Updating user document: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET doc = doc || $2 WHERE id = $1 RETURNING id, doc",
        )
        .bind(id.into_inner())
        .bind(Value::Object(fields))
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(UserDocument::try_from).transpose()
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user document: {}", id);

        // Idempotent: zero rows affected is still success.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }
}

impl std::fmt::Debug for PgUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserRepository").finish_non_exhaustive()
    }
}
