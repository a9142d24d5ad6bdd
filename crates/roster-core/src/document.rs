//! The user document model.
//!
//! A user is an opaque document: a required, store-assigned identifier plus
//! a permissive map for everything else. No field beyond `id` is typed.

use crate::{RosterError, RosterResult, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The untyped remainder of a user document.
pub type FieldMap = serde_json::Map<String, Value>;

/// A user document: a required id and an extensible field map.
///
/// Serializes flat, so `{"id": "...", "name": "Alice"}` round-trips without
/// a nested wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Store-assigned identifier.
    pub id: UserId,

    /// All remaining fields, untyped.
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl UserDocument {
    /// Creates a document with an existing id.
    #[must_use]
    pub fn new(id: UserId, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    /// Returns a field by name, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Applies a partial update: incoming fields overwrite existing ones,
    /// untouched fields are kept. This mirrors the store's JSONB merge.
    pub fn apply(&mut self, fields: FieldMap) {
        for (key, value) in fields {
            self.fields.insert(key, value);
        }
    }
}

/// Checks incoming fields against the store schema.
///
/// The schema is deliberately permissive: the only rule is that the caller
/// must not supply its own `id`, since the store assigns identifiers.
pub fn validate_fields(fields: &FieldMap) -> RosterResult<()> {
    if fields.contains_key("id") {
        return Err(RosterError::validation(
            "field 'id' is assigned by the store and cannot be set",
        ));
    }
    Ok(())
}
