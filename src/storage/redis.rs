use crate::error::TokenError;
use crate::rotation::record::RefreshRecord;
use crate::storage::TokenStore;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::sync::Arc;
use tokio::sync::RwLock;

// Write paths run as server-side scripts so each operation is a single
// all-or-nothing step against the backing store; nothing is held across
// operation boundaries.

static INSERT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
if redis.call('SETNX', KEYS[1], ARGV[1]) == 0 then
    return 0
end
redis.call('SADD', KEYS[2], ARGV[2])
return 1
"#,
    )
});

static MARK_CONSUMED: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
    return 0
end
local record = cjson.decode(raw)
if record.used then
    return 0
end
record.used = true
redis.call('SET', KEYS[1], cjson.encode(record))
return 1
"#,
    )
});

static DELETE_ONE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
    return 0
end
local record = cjson.decode(raw)
if record.user_id ~= ARGV[1] then
    return 0
end
redis.call('DEL', KEYS[1])
redis.call('SREM', KEYS[2], ARGV[2])
return 1
"#,
    )
});

static DELETE_MANY: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local removed = 0
for _, id in ipairs(redis.call('SMEMBERS', KEYS[1])) do
    removed = removed + redis.call('DEL', ARGV[1] .. id)
end
redis.call('DEL', KEYS[1])
return removed
"#,
    )
});

const RECORD_PREFIX: &str = "refresh:";

fn record_key(id: &str) -> String {
    format!("{}{}", RECORD_PREFIX, id)
}

fn user_key(user_id: &str) -> String {
    format!("user_refresh:{}", user_id)
}

/// Redis-backed token store. Records live at `refresh:{id}` as JSON; the
/// per-user index at `user_refresh:{user_id}` is a set of owned ids.
/// Records carry no TTL: expired-but-unused credentials are filtered out
/// at verification time, not purged here.
pub struct RedisStore {
    conn: Arc<RwLock<ConnectionManager>>,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self, TokenError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(RedisStore {
            conn: Arc::new(RwLock::new(conn)),
        })
    }
}

#[async_trait]
impl TokenStore for RedisStore {
    async fn insert(&self, record: &RefreshRecord) -> Result<(), TokenError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| TokenError::Internal(e.to_string()))?;

        let mut conn = self.conn.write().await;
        let created: i64 = INSERT
            .key(record_key(&record.id))
            .key(user_key(&record.user_id))
            .arg(payload)
            .arg(&record.id)
            .invoke_async(&mut *conn)
            .await?;

        if created == 0 {
            return Err(TokenError::Persistence(format!(
                "refresh id {} already present",
                record.id
            )));
        }
        Ok(())
    }

    async fn mark_consumed(&self, id: &str) -> Result<u64, TokenError> {
        let mut conn = self.conn.write().await;
        let affected: u64 = MARK_CONSUMED
            .key(record_key(id))
            .invoke_async(&mut *conn)
            .await?;
        Ok(affected)
    }

    async fn delete_one(&self, user_id: &str, id: &str) -> Result<u64, TokenError> {
        let mut conn = self.conn.write().await;
        let affected: u64 = DELETE_ONE
            .key(record_key(id))
            .key(user_key(user_id))
            .arg(user_id)
            .arg(id)
            .invoke_async(&mut *conn)
            .await?;
        Ok(affected)
    }

    async fn delete_many(&self, user_id: &str) -> Result<u64, TokenError> {
        let mut conn = self.conn.write().await;
        let removed: u64 = DELETE_MANY
            .key(user_key(user_id))
            .arg(RECORD_PREFIX)
            .invoke_async(&mut *conn)
            .await?;
        Ok(removed)
    }

    async fn exists_user(&self, user_id: &str) -> Result<bool, TokenError> {
        let mut conn = self.conn.write().await;
        let owned: u64 = conn.scard(user_key(user_id)).await?;
        Ok(owned > 0)
    }

    async fn exists_active(&self, id: &str) -> Result<bool, TokenError> {
        let mut conn = self.conn.write().await;
        let raw: Option<String> = conn.get(record_key(id)).await?;

        match raw {
            Some(raw) => {
                let record: RefreshRecord = serde_json::from_str(&raw)
                    .map_err(|e| TokenError::Internal(e.to_string()))?;
                Ok(record.is_active())
            }
            None => Ok(false),
        }
    }
}
