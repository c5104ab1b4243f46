use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{PortalError, Result};

declare_object_cache_plugin!("redis", RedisObjectCache);

/// SCAN 每批返回的键数量
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    // 多路复用连接可廉价克隆，整个进程共用一条
    conn: MultiplexedConnection,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub async fn connect() -> Result<Self> {
        let config = AppConfig::get();
        let redis = &config.cache.redis;
        Self::connect_with(&redis.url, &redis.key_prefix, config.cache.default_ttl).await
    }

    /// 建立连接并 PING 一次，失败由调用方回退到内存缓存
    pub async fn connect_with(url: &str, key_prefix: &str, default_ttl: u64) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| PortalError::cache_connection(format!("Invalid Redis URL '{url}': {e}")))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PortalError::cache_connection(format!("Redis connection failed: {e}")))?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| PortalError::cache_connection(format!("Redis ping failed: {e}")))?;
        debug!(
            "Redis cache ready at {} (prefix '{}', ttl {}s): {}",
            url, key_prefix, default_ttl, pong
        );

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
            default_ttl,
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// 收集本前缀下的全部键
    async fn scan_prefix(&self) -> redis::RedisResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                return Ok(keys);
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.namespaced(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let mut conn = self.conn.clone();
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.namespaced(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, i64>(self.namespaced(key)).await {
            error!("Failed to remove key '{}': {}", key, e);
        }
    }

    async fn invalidate_all(&self) {
        // 没有前缀时会清掉共享实例上的其他数据
        if self.key_prefix.is_empty() {
            warn!("Refusing to invalidate Redis cache without a key prefix");
            return;
        }

        let keys = match self.scan_prefix().await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to scan cache keys: {}", e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }

        let mut conn = self.conn.clone();
        match conn.del::<_, i64>(keys).await {
            Ok(removed) => debug!("Invalidated {} cache keys", removed),
            Err(e) => error!("Failed to invalidate cache keys: {}", e),
        }
    }
}
