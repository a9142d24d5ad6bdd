//! Store adapter trait definition.

use async_trait::async_trait;
use roster_core::{FieldMap, Interface, RosterResult, UserDocument, UserId};

/// Store adapter for the user document collection.
///
/// Leaf component: CRUD against the persistent collection, nothing else.
/// Connectivity and query failures surface as `RosterError::Store`; schema
/// violations on insert/update surface as `RosterError::Validation`.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Returns all user documents currently in the collection.
    async fn list(&self) -> RosterResult<Vec<UserDocument>>;

    /// Inserts a new document. The store assigns the identifier.
    async fn insert(&self, fields: FieldMap) -> RosterResult<UserDocument>;

    /// Applies a partial update and returns the post-update document, or
    /// `None` when no document has the given identifier.
    async fn update_by_id(&self, id: UserId, fields: FieldMap)
        -> RosterResult<Option<UserDocument>>;

    /// Removes the document if present. Idempotent: an absent id is still
    /// success.
    async fn delete_by_id(&self, id: UserId) -> RosterResult<()>;
}
