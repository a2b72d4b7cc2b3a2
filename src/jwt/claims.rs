use serde::{Deserialize, Serialize};

/// Claims carried by an access credential. `refresh_id` binds the access
/// credential to exactly one refresh credential; the binding is enforced
/// at rotation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub user_id: String,
    pub refresh_id: String,
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(user_id: impl Into<String>, refresh_id: impl Into<String>, exp: i64) -> Self {
        AccessClaims {
            user_id: user_id.into(),
            refresh_id: refresh_id.into(),
            exp,
        }
    }
}

/// Claims carried by a refresh credential. `id` matches the persisted
/// record and never changes for the lifetime of the credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub user_id: String,
    pub id: String,
    pub exp: i64,
}

impl RefreshClaims {
    pub fn new(user_id: impl Into<String>, id: impl Into<String>, exp: i64) -> Self {
        RefreshClaims {
            user_id: user_id.into(),
            id: id.into(),
            exp,
        }
    }
}
