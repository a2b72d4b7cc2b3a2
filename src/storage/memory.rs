use crate::error::TokenError;
use crate::rotation::record::RefreshRecord;
use crate::storage::TokenStore;
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory store for tests and development mode.
///
/// A single mutex around the map gives every operation the all-or-nothing
/// semantics the contract requires.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, RefreshRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert(&self, record: &RefreshRecord) -> Result<(), TokenError> {
        let mut records = self.records.lock().await;
        match records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(TokenError::Persistence(format!(
                "refresh id {} already present",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn mark_consumed(&self, id: &str) -> Result<u64, TokenError> {
        let mut records = self.records.lock().await;
        match records.get_mut(id) {
            Some(record) if !record.used => {
                record.used = true;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_one(&self, user_id: &str, id: &str) -> Result<u64, TokenError> {
        let mut records = self.records.lock().await;
        match records.get(id) {
            Some(record) if record.user_id == user_id => {
                records.remove(id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_many(&self, user_id: &str) -> Result<u64, TokenError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.user_id != user_id);
        Ok((before - records.len()) as u64)
    }

    async fn exists_user(&self, user_id: &str) -> Result<bool, TokenError> {
        let records = self.records.lock().await;
        Ok(records.values().any(|record| record.user_id == user_id))
    }

    async fn exists_active(&self, id: &str) -> Result<bool, TokenError> {
        let records = self.records.lock().await;
        Ok(records.get(id).is_some_and(|record| !record.used))
    }
}
