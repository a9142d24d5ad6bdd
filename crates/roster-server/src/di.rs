//! Dependency injection module using Shaku.
//!
//! Wires the Postgres pool, the user repository, the Redis cache, and the
//! user service into a single module that the router resolves from.

use roster_config::{DatabaseConfig, RedisConfig};
use roster_core::{RosterError, RosterResult};
use roster_repository::{DatabasePool, DatabasePoolParameters, PgUserRepository};
use roster_service::{
    RedisCacheService, RedisCacheServiceParameters, UserServiceComponent,
    UserServiceComponentParameters, SNAPSHOT_TTL,
};
use shaku::module;
use std::sync::Arc;

module! {
    pub AppModule {
        components = [
            DatabasePool,
            PgUserRepository,
            RedisCacheService,
            UserServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the application module with all dependencies.
///
/// Connects the database pool up front so a bad database URL fails startup
/// instead of the first request. The Redis pool is created lazily by
/// deadpool; when Redis is disabled the cache component runs as a no-op
/// and every read falls through to the store.
pub async fn build_app_module(
    db_config: &DatabaseConfig,
    redis_config: &RedisConfig,
) -> RosterResult<Arc<AppModule>> {
    let db_pool = DatabasePool::connect(db_config).await?;
    let cache_pool = create_cache_pool(redis_config)?;

    let module = AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
        })
        .with_component_parameters::<UserServiceComponent>(UserServiceComponentParameters {
            ttl: SNAPSHOT_TTL,
        })
        .build();

    Ok(Arc::new(module))
}

/// Creates the deadpool-redis pool from configuration, sized per
/// `pool_size`. Returns `None` when Redis is disabled. Connections are
/// established lazily on first use.
fn create_cache_pool(
    redis_config: &RedisConfig,
) -> RosterResult<Option<Arc<deadpool_redis::Pool>>> {
    if !redis_config.enabled {
        return Ok(None);
    }

    let mut cfg = deadpool_redis::Config::from_url(&redis_config.url);
    cfg.pool = Some(deadpool_redis::PoolConfig::new(
        redis_config.pool_size as usize,
    ));

    let pool = cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| RosterError::cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(Some(Arc::new(pool)))
}
