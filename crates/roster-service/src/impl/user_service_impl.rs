//! User service implementations.
//!
//! Both implementations carry the same cache-consistency policy:
//!
//! ```text
//! ABSENT -> (miss-fill) -> PRESENT(expiry) -> (expiry OR invalidate) -> ABSENT
//! ```
//!
//! Reads are read-through against the single `all_users` snapshot key;
//! every mutation deletes that key before its result is returned. Within
//! one request the invalidation is sequenced after the store call; across
//! requests there is no ordering guarantee, and concurrent misses are not
//! serialized (both may fill the cache, last write wins).

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::user_service::{UserService, SNAPSHOT_TTL};
use async_trait::async_trait;
use roster_core::{FieldMap, RosterResult, UserDocument, UserId};
use roster_repository::UserRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Generic user service implementation (non-DI).
///
/// Dependencies are explicit `Arc` handles; nothing is process-global.
pub struct UserServiceImpl<R: UserRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
}

impl<R: UserRepository> UserServiceImpl<R> {
    /// Creates a new user service with the fixed 60-second snapshot TTL.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            repository,
            cache,
            ttl: SNAPSHOT_TTL,
        }
    }

    /// Creates a user service with a custom snapshot TTL (tests shorten it).
    pub fn with_ttl(repository: Arc<R>, cache: Arc<dyn CacheInterface>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }
}

#[async_trait]
impl<R: UserRepository + 'static> UserService for UserServiceImpl<R> {
    async fn get_all(&self) -> RosterResult<Vec<UserDocument>> {
        let key = cache_keys::all_users();

        // Read path: a cache hit never touches the store. A cache *error*
        // fails the whole read, matching the write of the snapshot below.
        if let Some(users) = self.cache.get::<Vec<UserDocument>>(key).await? {
            debug!("Serving user list from cache");
            return Ok(users);
        }

        let users = self.repository.list().await?;
        self.cache.set(key, &users, self.ttl).await?;
        debug!("Serving user list from store; snapshot cached");

        Ok(users)
    }

    async fn create(&self, fields: FieldMap) -> RosterResult<UserDocument> {
        let created = self.repository.insert(fields).await?;
        self.invalidate().await;

        info!("User created: {}", created.id);
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: UserId,
        fields: FieldMap,
    ) -> RosterResult<Option<UserDocument>> {
        let updated = self.repository.update_by_id(id, fields).await?;
        self.invalidate().await;

        match &updated {
            Some(doc) => info!("User updated: {}", doc.id),
            None => debug!("Update for absent user id: {}", id),
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<()> {
        self.repository.delete_by_id(id).await?;
        self.invalidate().await;

        info!("User deleted: {}", id);
        Ok(())
    }

    async fn invalidate(&self) {
        // Must never fail the mutation it follows: the store write has
        // already succeeded. Worst case the stale snapshot lives until
        // its TTL elapses.
        if let Err(e) = self.cache.delete(cache_keys::all_users()).await {
            warn!("Cache invalidation failed: {}", e);
        }
    }
}

impl<R: UserRepository> std::fmt::Debug for UserServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}

/// Concrete user service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(default = SNAPSHOT_TTL)]
    ttl: Duration,
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn get_all(&self) -> RosterResult<Vec<UserDocument>> {
        let key = cache_keys::all_users();

        if let Some(users) = self.cache.get::<Vec<UserDocument>>(key).await? {
            debug!("Serving user list from cache");
            return Ok(users);
        }

        let users = self.repository.list().await?;
        self.cache.set(key, &users, self.ttl).await?;
        debug!("Serving user list from store; snapshot cached");

        Ok(users)
    }

    async fn create(&self, fields: FieldMap) -> RosterResult<UserDocument> {
        let created = self.repository.insert(fields).await?;
        self.invalidate().await;

        info!("User created: {}", created.id);
        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: UserId,
        fields: FieldMap,
    ) -> RosterResult<Option<UserDocument>> {
        let updated = self.repository.update_by_id(id, fields).await?;
        self.invalidate().await;

        match &updated {
            Some(doc) => info!("User updated: {}", doc.id),
            None => debug!("Update for absent user id: {}", id),
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: UserId) -> RosterResult<()> {
        self.repository.delete_by_id(id).await?;
        self.invalidate().await;

        info!("User deleted: {}", id);
        Ok(())
    }

    async fn invalidate(&self) {
        if let Err(e) = self.cache.delete(cache_keys::all_users()).await {
            warn!("Cache invalidation failed: {}", e);
        }
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheInterface;
    use roster_core::{validate_fields, RosterError};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Mock store adapter with call counting and an optional injected
    /// delay on `list`.
    struct MockRepository {
        docs: Mutex<Vec<UserDocument>>,
        list_calls: AtomicUsize,
        list_delay: Option<Duration>,
        fail_list: AtomicBool,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                docs: Mutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
                list_delay: None,
                fail_list: AtomicBool::new(false),
            }
        }

        fn with_list_delay(delay: Duration) -> Self {
            Self {
                list_delay: Some(delay),
                ..Self::new()
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for MockRepository {
        async fn list(&self) -> RosterResult<Vec<UserDocument>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(RosterError::store("store unreachable"));
            }
            if let Some(delay) = self.list_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.docs.lock().unwrap().clone())
        }

        async fn insert(&self, fields: FieldMap) -> RosterResult<UserDocument> {
            validate_fields(&fields)?;
            let doc = UserDocument::new(UserId::new(), fields);
            self.docs.lock().unwrap().push(doc.clone());
            Ok(doc)
        }

        async fn update_by_id(
            &self,
            id: UserId,
            fields: FieldMap,
        ) -> RosterResult<Option<UserDocument>> {
            validate_fields(&fields)?;
            let mut docs = self.docs.lock().unwrap();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(doc) => {
                    doc.apply(fields);
                    Ok(Some(doc.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete_by_id(&self, id: UserId) -> RosterResult<()> {
            self.docs.lock().unwrap().retain(|d| d.id != id);
            Ok(())
        }
    }

    /// In-memory cache honoring per-entry expiry, with switchable failure
    /// modes for reads, writes, and deletes.
    struct MockCache {
        entries: Mutex<HashMap<String, (String, Instant)>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        fail_deletes: AtomicBool,
    }

    impl MockCache {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                fail_reads: AtomicBool::new(false),
                fail_writes: AtomicBool::new(false),
                fail_deletes: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl CacheInterface for MockCache {
        fn is_enabled(&self) -> bool {
            true
        }

        async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RosterError::cache("cache unreachable"));
            }
            let mut entries = self.entries.lock().unwrap();
            match entries.get(key) {
                Some((_, expiry)) if *expiry <= Instant::now() => {
                    entries.remove(key);
                    Ok(None)
                }
                Some((value, _)) => Ok(Some(value.clone())),
                None => Ok(None),
            }
        }

        async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(RosterError::cache("cache unreachable"));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
            Ok(())
        }

        async fn delete(&self, key: &str) -> RosterResult<bool> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(RosterError::cache("cache unreachable"));
            }
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        async fn exists(&self, key: &str) -> RosterResult<bool> {
            Ok(self
                .get_raw(key)
                .await?
                .is_some())
        }
    }

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().cloned().expect("object literal")
    }

    fn service(
        repo: Arc<MockRepository>,
        cache: Arc<MockCache>,
    ) -> UserServiceImpl<MockRepository> {
        UserServiceImpl::new(repo, cache)
    }

    #[tokio::test]
    async fn test_cold_read_fills_cache_from_store() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        let users = svc.get_all().await.unwrap();

        assert!(users.is_empty());
        assert_eq!(repo.list_calls(), 1);
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        svc.get_all().await.unwrap();
        svc.get_all().await.unwrap();
        svc.get_all().await.unwrap();

        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_created_user_round_trips_through_cold_cache() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        let created = svc
            .create(fields(json!({"name": "Alice", "age": 30})))
            .await
            .unwrap();

        let users = svc.get_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, created.id);
        assert_eq!(users[0].field("name"), Some(&json!("Alice")));
        assert_eq!(users[0].field("age"), Some(&json!(30)));
    }

    #[tokio::test]
    async fn test_create_invalidates_snapshot() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        // Prime the cache, then mutate.
        svc.get_all().await.unwrap();
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());

        svc.create(fields(json!({"name": "Alice"}))).await.unwrap();
        assert!(!cache.exists(cache_keys::all_users()).await.unwrap());

        // The next read within the TTL window reflects the mutation.
        let users = svc.get_all().await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_snapshot() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        let created = svc.create(fields(json!({"name": "Alice"}))).await.unwrap();
        svc.get_all().await.unwrap();
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());

        let updated = svc
            .update_by_id(created.id, fields(json!({"name": "Alicia"})))
            .await
            .unwrap()
            .expect("document exists");
        assert_eq!(updated.field("name"), Some(&json!("Alicia")));
        assert!(!cache.exists(cache_keys::all_users()).await.unwrap());

        let users = svc.get_all().await.unwrap();
        assert_eq!(users[0].field("name"), Some(&json!("Alicia")));
    }

    #[tokio::test]
    async fn test_update_absent_id_returns_none_but_still_invalidates() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        svc.get_all().await.unwrap();
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());

        let updated = svc
            .update_by_id(UserId::new(), fields(json!({"name": "Ghost"})))
            .await
            .unwrap();

        assert!(updated.is_none());
        // The store call completed, so the invalidation fired anyway.
        assert!(!cache.exists(cache_keys::all_users()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_is_idempotent() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo.clone(), cache.clone());

        let created = svc.create(fields(json!({"name": "Alice"}))).await.unwrap();
        svc.get_all().await.unwrap();

        svc.delete_by_id(created.id).await.unwrap();
        assert!(!cache.exists(cache_keys::all_users()).await.unwrap());
        assert!(svc.get_all().await.unwrap().is_empty());

        // Deleting the same id again succeeds without error.
        svc.delete_by_id(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_expires_after_ttl() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = UserServiceImpl::with_ttl(
            repo.clone(),
            cache.clone(),
            Duration::from_millis(50),
        );

        svc.get_all().await.unwrap();
        svc.get_all().await.unwrap();
        assert_eq!(repo.list_calls(), 1);

        tokio::time::sleep(Duration::from_millis(80)).await;

        svc.get_all().await.unwrap();
        assert_eq!(repo.list_calls(), 2);
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_query_store() {
        let repo = Arc::new(MockRepository::with_list_delay(Duration::from_millis(50)));
        let cache = Arc::new(MockCache::new());
        let svc = Arc::new(service(repo.clone(), cache.clone()));

        // Misses are not serialized: both in-flight reads query the store
        // and both write the key; the last write wins.
        let (a, b) = tokio::join!(svc.get_all(), svc.get_all());

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(repo.list_calls(), 2);
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_failure_propagates_on_read() {
        let repo = Arc::new(MockRepository::new());
        repo.fail_list.store(true, Ordering::SeqCst);
        let cache = Arc::new(MockCache::new());
        let svc = service(repo, cache);

        let result = svc.get_all().await;
        assert!(matches!(result, Err(RosterError::Store(_))));
    }

    #[tokio::test]
    async fn test_cache_read_failure_fails_the_read() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        cache.fail_reads.store(true, Ordering::SeqCst);
        let svc = service(repo.clone(), cache);

        let result = svc.get_all().await;
        assert!(matches!(result, Err(RosterError::Cache(_))));
        assert_eq!(repo.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_write_failure_fails_the_read() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        cache.fail_writes.store(true, Ordering::SeqCst);
        let svc = service(repo.clone(), cache);

        let result = svc.get_all().await;
        assert!(matches!(result, Err(RosterError::Cache(_))));
        assert_eq!(repo.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_failure_does_not_fail_mutation() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        cache.fail_deletes.store(true, Ordering::SeqCst);
        let svc = service(repo.clone(), cache.clone());

        // All three mutations succeed even though the invalidate step fails.
        let created = svc.create(fields(json!({"name": "Alice"}))).await.unwrap();
        svc.update_by_id(created.id, fields(json!({"name": "Alicia"})))
            .await
            .unwrap();
        svc.delete_by_id(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_caller_supplied_id() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = service(repo, cache);

        let result = svc.create(fields(json!({"id": "mine"}))).await;
        assert!(matches!(result, Err(RosterError::Validation(_))));
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let repo = Arc::new(MockRepository::new());
        let cache = Arc::new(MockCache::new());
        let svc = UserServiceImpl::with_ttl(
            repo.clone(),
            cache.clone(),
            Duration::from_millis(50),
        );

        // Create Alice; store assigns the id.
        let alice = svc.create(fields(json!({"name": "Alice"}))).await.unwrap();

        // Immediate read: Alice is in the list, cache is now PRESENT.
        let users = svc.get_all().await.unwrap();
        assert!(users.iter().any(|u| u.id == alice.id));
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());
        assert_eq!(repo.list_calls(), 1);

        // After the TTL window elapses, the store is queried again and a
        // fresh snapshot is cached.
        tokio::time::sleep(Duration::from_millis(80)).await;
        let users = svc.get_all().await.unwrap();
        assert!(users.iter().any(|u| u.id == alice.id));
        assert_eq!(repo.list_calls(), 2);
        assert!(cache.exists(cache_keys::all_users()).await.unwrap());
    }
}
