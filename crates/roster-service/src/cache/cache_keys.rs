//! Cache key names.
//!
//! The user service maintains exactly one entry, so there is exactly one
//! key. The literal value is part of the wire contract: external tooling
//! inspects `all_users` directly in Redis.

/// Key holding the JSON-serialized snapshot of the whole user collection.
pub const ALL_USERS: &str = "all_users";

/// Returns the snapshot key for the user collection.
#[must_use]
pub const fn all_users() -> &'static str {
    ALL_USERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_users_key_is_stable() {
        // Wire contract: the key name must stay exactly this.
        assert_eq!(all_users(), "all_users");
    }
}
