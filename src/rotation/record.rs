use serde::{Deserialize, Serialize};

/// Refresh-credential record as persisted by the token store.
///
/// `id` is unique and immutable once created. `used` only ever flips
/// false -> true; a consumed record stays in the store for audit and can
/// never authorize rotation again. Expired-but-unused records are filtered
/// out logically at verification time rather than deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshRecord {
    pub id: String,
    pub user_id: String,
    pub secret_hash: String,
    pub expires_at: i64,
    pub used: bool,
}

impl RefreshRecord {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        secret_hash: impl Into<String>,
        expires_at: i64,
    ) -> Self {
        RefreshRecord {
            id: id.into(),
            user_id: user_id.into(),
            secret_hash: secret_hash.into(),
            expires_at,
            used: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.used
    }
}

/// Signed access credential plus its expiry. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

/// Pair produced by the issuance flow. `refresh_token` is the transport
/// (base64) form handed to the caller; `record` is what was persisted.
/// Both land together or not at all.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: AccessToken,
    pub refresh_token: String,
    pub record: RefreshRecord,
}
