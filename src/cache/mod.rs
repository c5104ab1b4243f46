//! 对象缓存层
//!
//! 归档数据只在关闭反馈轮次时变化，学期列表与归档总数缓存在这里，关闭成功后失效。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// 已归档学期列表
pub const ARCHIVED_SEMESTERS_KEY: &str = "archive:semesters";
/// 归档总数
pub const ARCHIVED_COUNT_KEY: &str = "archive:count";
/// 归档视图的缓存时长（秒）
///
/// 关闭提交前读到的旧值可能在失效之后才写回，短 TTL 限定其存活时间。
pub const ARCHIVE_VIEW_TTL: u64 = 30;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端可达但读取失败，调用方按未命中处理
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化缓存值，任何失败都视为未命中
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound | CacheResult::ExistsButNoValue => None,
    }
}

/// 序列化后写入缓存，ttl 为 0 时使用后端默认值
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: &str, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.insert_raw(key.to_string(), raw, ttl).await,
        Err(e) => warn!("Failed to serialize cache entry '{}': {}", key, e),
    }
}

/// 写入归档视图缓存，使用 [`ARCHIVE_VIEW_TTL`]
pub async fn cache_archive_view<T: Serialize>(cache: &dyn ObjectCache, key: &str, value: &T) {
    insert_json(cache, key, value, ARCHIVE_VIEW_TTL).await;
}

/// 归档发生变化后清除相关缓存
pub async fn invalidate_archive_views(cache: &dyn ObjectCache) {
    cache.remove(ARCHIVED_SEMESTERS_KEY).await;
    cache.remove(ARCHIVED_COUNT_KEY).await;
    debug!("Archive cache entries invalidated");
}

/// 声明缓存插件，生成对应模块的 `register()` 函数
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::connect().await?;
                        let boxed: Box<dyn $crate::cache::ObjectCache> = Box::new(cache);
                        Ok::<_, $crate::errors::PortalError>(boxed)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    #[tokio::test]
    async fn test_json_helpers_and_invalidation() {
        let cache = MokaCacheWrapper::with_settings(100, 60);

        assert_eq!(get_json::<Vec<String>>(&cache, ARCHIVED_SEMESTERS_KEY).await, None);

        let semesters = vec!["Winter-2025".to_string(), "Monsoon-2024".to_string()];
        insert_json(&cache, ARCHIVED_SEMESTERS_KEY, &semesters, 0).await;
        insert_json(&cache, ARCHIVED_COUNT_KEY, &42i64, 0).await;
        assert_eq!(
            get_json::<Vec<String>>(&cache, ARCHIVED_SEMESTERS_KEY).await,
            Some(semesters)
        );

        invalidate_archive_views(&cache).await;
        assert_eq!(get_json::<i64>(&cache, ARCHIVED_COUNT_KEY).await, None);
        assert_eq!(get_json::<Vec<String>>(&cache, ARCHIVED_SEMESTERS_KEY).await, None);
    }

    #[derive(Default)]
    struct TtlRecorder {
        inserts: std::sync::Mutex<Vec<(String, u64)>>,
    }

    #[async_trait]
    impl ObjectCache for TtlRecorder {
        async fn get_raw(&self, _key: &str) -> CacheResult<String> {
            CacheResult::NotFound
        }
        async fn insert_raw(&self, key: String, _value: String, ttl: u64) {
            self.inserts.lock().unwrap().push((key, ttl));
        }
        async fn remove(&self, _key: &str) {}
        async fn invalidate_all(&self) {}
    }

    #[tokio::test]
    async fn test_archive_views_use_short_ttl() {
        let cache = TtlRecorder::default();
        cache_archive_view(&cache, ARCHIVED_COUNT_KEY, &7i64).await;
        cache_archive_view(&cache, ARCHIVED_SEMESTERS_KEY, &vec!["Winter-2025"]).await;

        let inserts = cache.inserts.lock().unwrap().clone();
        assert_eq!(
            inserts,
            vec![
                (ARCHIVED_COUNT_KEY.to_string(), ARCHIVE_VIEW_TTL),
                (ARCHIVED_SEMESTERS_KEY.to_string(), ARCHIVE_VIEW_TTL),
            ]
        );
        assert!(ARCHIVE_VIEW_TTL > 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw(ARCHIVED_COUNT_KEY.to_string(), "not json".into(), 0)
            .await;
        assert_eq!(get_json::<i64>(&cache, ARCHIVED_COUNT_KEY).await, None);
        assert_eq!(cache.get_raw(ARCHIVED_COUNT_KEY).await, CacheResult::NotFound);
    }
}
