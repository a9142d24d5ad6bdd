//! User service trait definition.

use async_trait::async_trait;
use roster_core::{FieldMap, Interface, RosterResult, UserDocument, UserId};
use std::time::Duration;

/// Fixed lifetime of the cached user-collection snapshot.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(60);

/// User service: CRUD over the user collection under the
/// read-through / write-invalidate cache discipline.
///
/// Reads go through the cached snapshot; writes go to the store and then
/// destroy the snapshot before returning.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Returns all users, serving from the cached snapshot when present
    /// and unexpired, otherwise from the store (filling the cache).
    async fn get_all(&self) -> RosterResult<Vec<UserDocument>>;

    /// Creates a new user. The store assigns the identifier.
    async fn create(&self, fields: FieldMap) -> RosterResult<UserDocument>;

    /// Applies a partial update and returns the post-update document, or
    /// `None` when the id is absent (reported to HTTP callers as a
    /// null-bodied success, not an error).
    async fn update_by_id(&self, id: UserId, fields: FieldMap)
        -> RosterResult<Option<UserDocument>>;

    /// Deletes a user. Idempotent: an absent id is still success.
    async fn delete_by_id(&self, id: UserId) -> RosterResult<()>;

    /// Unconditionally deletes the cached snapshot.
    ///
    /// Runs synchronously after every successful mutation, before the
    /// mutation's result is returned. Never fails: a cache failure here is
    /// logged and swallowed, because the mutation it follows has already
    /// succeeded against the store.
    async fn invalidate(&self);
}
