//! 会话用户缓存
//!
//! 以 bearer token 为键缓存 `/auth/me` 的结果，避免每个受角色保护的请求
//! 都访问上游。收到 401 时按令牌剔除。

use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::users::entities::User;

#[derive(Clone)]
pub struct UserCache {
    inner: Cache<String, User>,
}

impl UserCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        debug!(
            "UserCache initialized with max capacity: {}, ttl: {}s",
            config.cache.max_capacity, config.cache.user_ttl
        );
        Self::new(
            config.cache.max_capacity,
            Duration::from_secs(config.cache.user_ttl),
        )
    }

    pub async fn get(&self, token: &str) -> Option<User> {
        self.inner.get(token).await
    }

    pub async fn insert(&self, token: &str, user: User) {
        self.inner.insert(token.to_string(), user).await;
    }

    pub async fn invalidate(&self, token: &str) {
        self.inner.invalidate(token).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({"id": 1, "name": "Budi", "role": "dosen"}))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_get_invalidate() {
        let cache = UserCache::new(10, Duration::from_secs(60));
        assert!(cache.get("abc").await.is_none());
        cache.insert("abc", user()).await;
        assert_eq!(cache.get("abc").await.unwrap().id, 1);
        cache.invalidate("abc").await;
        assert!(cache.get("abc").await.is_none());
    }
}
