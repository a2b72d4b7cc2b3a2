//! Property-based tests for the credential codec.

use auth_token_service::error::TokenError;
use auth_token_service::jwt::claims::{AccessClaims, RefreshClaims};
use auth_token_service::jwt::TokenCodec;
use chrono::Utc;
use proptest::prelude::*;

/// Generate arbitrary user IDs.
fn arb_user_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,32}"
}

/// Generate arbitrary signing secrets.
fn arb_secret() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 16..64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Signed refresh claims verify back to the exact same claims.
    #[test]
    fn prop_refresh_sign_verify_round_trip(
        user_id in arb_user_id(),
        secret in arb_secret(),
    ) {
        let codec = TokenCodec::new(&secret);
        let id = uuid::Uuid::new_v4().to_string();
        let claims = RefreshClaims::new(&user_id, &id, Utc::now().timestamp() + 3600);

        let signed = codec.sign_refresh(&claims).unwrap();
        let verified = codec.verify_refresh(&signed).unwrap();

        prop_assert_eq!(claims, verified);
    }

    /// The transport form decodes back to byte-identical signed material.
    #[test]
    fn prop_transport_round_trip(
        user_id in arb_user_id(),
        secret in arb_secret(),
    ) {
        let codec = TokenCodec::new(&secret);
        let claims = RefreshClaims::new(&user_id, "id-1", Utc::now().timestamp() + 3600);
        let signed = codec.sign_refresh(&claims).unwrap();

        let encoded = TokenCodec::encode_transport(&signed);
        let decoded = TokenCodec::decode_transport(&encoded).unwrap();

        prop_assert_eq!(signed, decoded);
    }

    /// A credential signed under one secret never verifies under another.
    #[test]
    fn prop_wrong_secret_never_verifies(
        user_id in arb_user_id(),
        secret in arb_secret(),
    ) {
        let codec = TokenCodec::new(&secret);
        let mut other_secret = secret.clone();
        other_secret.push(0x5a);
        let other = TokenCodec::new(&other_secret);

        let claims = AccessClaims::new(&user_id, "refresh-1", Utc::now().timestamp() + 3600);
        let signed = codec.sign_access(&claims).unwrap();

        let is_invalid_credential = matches!(
            other.verify_access(&signed),
            Err(TokenError::InvalidCredential { .. })
        );
        prop_assert!(is_invalid_credential);
    }

    /// Access and refresh claim shapes are not interchangeable at
    /// verification time.
    #[test]
    fn prop_claim_shapes_are_checked(
        user_id in arb_user_id(),
        secret in arb_secret(),
    ) {
        let codec = TokenCodec::new(&secret);
        let claims = AccessClaims::new(&user_id, "refresh-1", Utc::now().timestamp() + 3600);
        let signed = codec.sign_access(&claims).unwrap();

        let is_invalid_credential = matches!(
            codec.verify_refresh(&signed),
            Err(TokenError::InvalidCredential { .. })
        );
        prop_assert!(is_invalid_credential);
    }
}
