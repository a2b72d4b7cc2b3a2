use crate::error::TokenError;
use crate::hashing;
use crate::jwt::claims::{AccessClaims, RefreshClaims};
use crate::jwt::TokenCodec;
use crate::rotation::record::{AccessToken, RefreshRecord, TokenPair};
use crate::storage::TokenStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates the refresh-credential lifecycle: issuance, single-use
/// rotation, and revocation.
pub struct TokenRotator {
    codec: Arc<TokenCodec>,
    store: Arc<dyn TokenStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenRotator {
    pub fn new(
        codec: Arc<TokenCodec>,
        store: Arc<dyn TokenStore>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        TokenRotator {
            codec,
            store,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issues a bound access/refresh pair for `user_id`.
    ///
    /// The pair is only returned after the hashed record has been
    /// persisted; on any failure no partial state is observable.
    pub async fn issue_pair(&self, user_id: &str) -> Result<TokenPair, TokenError> {
        let refresh_id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let refresh_exp = now + self.refresh_ttl.as_secs() as i64;
        let access_exp = now + self.access_ttl.as_secs() as i64;

        let signed_refresh = self
            .codec
            .sign_refresh(&RefreshClaims::new(user_id, &refresh_id, refresh_exp))?;
        let signed_access = self
            .codec
            .sign_access(&AccessClaims::new(user_id, &refresh_id, access_exp))?;

        // Hash before any store write; unhashed secrets never land at rest.
        let secret_hash = hashing::hash_secret(&signed_refresh).await?;

        let record = RefreshRecord::new(&refresh_id, user_id, secret_hash, refresh_exp);
        self.store.insert(&record).await?;

        info!(
            user_id = %user_id,
            refresh_id = %record.id,
            "Issued credential pair"
        );

        Ok(TokenPair {
            access: AccessToken {
                token: signed_access,
                expires_at: access_exp,
            },
            refresh_token: TokenCodec::encode_transport(&signed_refresh),
            record,
        })
    }

    /// Exchanges a valid, unconsumed refresh credential for a brand-new
    /// pair, consuming the old credential.
    ///
    /// The store's conditional mark-consumed write is the sole
    /// serialization point: of any number of concurrent attempts on the
    /// same credential, exactly one wins.
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, TokenError> {
        let signed_refresh = TokenCodec::decode_transport(refresh_token)?;
        let refresh_claims = self.codec.verify_refresh(&signed_refresh)?;
        let access_claims = self.codec.verify_access(access_token)?;

        if access_claims.refresh_id != refresh_claims.id {
            return Err(TokenError::CredentialMismatch);
        }

        if !self.store.exists_active(&refresh_claims.id).await? {
            return Err(TokenError::UnknownOrConsumed);
        }

        let affected = self.store.mark_consumed(&refresh_claims.id).await?;
        if affected == 0 {
            // Someone else consumed it between the lookup and the write.
            warn!(
                refresh_id = %refresh_claims.id,
                "Refresh credential consumed by a concurrent rotation"
            );
            return Err(TokenError::UnknownOrConsumed);
        }

        info!(
            user_id = %refresh_claims.user_id,
            refresh_id = %refresh_claims.id,
            "Consumed refresh credential"
        );

        self.issue_pair(&refresh_claims.user_id).await
    }

    /// Deletes a single refresh credential owned by `user_id`.
    pub async fn revoke_one(&self, user_id: &str, refresh_id: &str) -> Result<(), TokenError> {
        if !self.store.exists_user(user_id).await? {
            return Err(TokenError::UserNotFound);
        }

        let affected = self.store.delete_one(user_id, refresh_id).await?;
        if affected == 0 {
            return Err(TokenError::RecordNotFound);
        }

        info!(
            user_id = %user_id,
            refresh_id = %refresh_id,
            "Revoked refresh credential"
        );
        Ok(())
    }

    /// Deletes every refresh credential owned by `user_id`; returns the
    /// number of records removed.
    pub async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64, TokenError> {
        if !self.store.exists_user(user_id).await? {
            return Err(TokenError::UserNotFound);
        }

        let count = self.store.delete_many(user_id).await?;

        info!(
            user_id = %user_id,
            count = %count,
            "Revoked all refresh credentials for user"
        );
        Ok(count)
    }
}
