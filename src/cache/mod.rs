use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// JSON values in Redis behind a multiplexed connection manager.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

fn codec_error(what: &'static str, e: serde_json::Error) -> RedisError {
    RedisError::from((redis::ErrorKind::TypeError, what, e.to_string()))
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        value
            .map(|v| serde_json::from_str(&v).map_err(|e| codec_error("Deserialization error", e)))
            .transpose()
    }

    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> redis::RedisResult<()> {
        let serialized =
            serde_json::to_string(value).map_err(|e| codec_error("Serialization error", e))?;

        redis::cmd("SET")
            .arg(key)
            .arg(serialized)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Drop every key, logging instead of failing: a stale entry expires on its own.
    pub async fn invalidate(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                tracing::warn!("Cache invalidation failed for {key}: {e}");
            }
        }
    }

    /// Read-through lookup. Cache errors fall back to `load`; `None` is never cached.
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        load: F,
    ) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(cached)) => return Ok(Some(cached)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache error: {e}"),
        }

        let loaded = load().await?;
        if let Some(value) = &loaded {
            if let Err(e) = self.set(key, value, ttl).await {
                tracing::warn!("Cache write failed for {key}: {e}");
            }
        }
        Ok(loaded)
    }
}

/// Cache key generators
pub mod keys {
    use uuid::Uuid;

    /// Full profile as returned to its owner or an admin.
    pub fn profile(id: Uuid) -> String {
        format!("profile:{id}")
    }

    /// Public craftsman detail (profile, rating, portfolio...).
    pub fn craftsman(id: Uuid) -> String {
        format!("craftsman:{id}")
    }

    /// Every key that holds data derived from one profile.
    pub fn for_profile(id: Uuid) -> Vec<String> {
        vec![profile(id), craftsman(id)]
    }
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;

#[cfg(test)]
mod tests {
    use super::keys;
    use uuid::Uuid;

    #[test]
    fn key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            keys::profile(id),
            "profile:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            keys::for_profile(id),
            vec![keys::profile(id), keys::craftsman(id)]
        );
    }
}
