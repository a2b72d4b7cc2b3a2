use crate::error::{CredentialKind, TokenError};
use crate::jwt::claims::{AccessClaims, RefreshClaims};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Single symmetric algorithm for the whole service. The verifier pins it,
/// so a credential carrying any other `alg` header is rejected outright.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Signs and verifies both credential kinds with one shared secret.
///
/// The secret is captured at construction and never read from ambient
/// state afterwards.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = true;
        // No leeway: an expired credential is expired, exactly at `exp`.
        validation.leeway = 0;

        TokenCodec {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn sign_access(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        self.sign(claims)
    }

    pub fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, TokenError> {
        self.sign(claims)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Internal(format!("credential signing failed: {}", e)))
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify(token, CredentialKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.verify(token, CredentialKind::Refresh)
    }

    fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
        kind: CredentialKind,
    ) -> Result<T, TokenError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::invalid_credential(kind, verification_reason(&e)))
    }

    /// Encodes a signed refresh credential for transport. Standard padded
    /// base64, matching what callers are expected to hand back.
    pub fn encode_transport(signed: &str) -> String {
        STANDARD.encode(signed.as_bytes())
    }

    /// Decodes the transport form back into signed material. Failure here
    /// is a transport problem, distinct from signature failure.
    pub fn decode_transport(encoded: &str) -> Result<String, TokenError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| TokenError::MalformedEncoding(e.to_string()))?;

        String::from_utf8(bytes)
            .map_err(|_| TokenError::MalformedEncoding("decoded bytes are not UTF-8".to_string()))
    }
}

fn verification_reason(err: &jsonwebtoken::errors::Error) -> String {
    match err.kind() {
        ErrorKind::ExpiredSignature => "expired".to_string(),
        ErrorKind::InvalidSignature => "signature verification failed".to_string(),
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            "unsupported signing algorithm".to_string()
        }
        ErrorKind::Json(_) => "unexpected claims shape".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const SECRET: &[u8] = b"codec-test-secret";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET)
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_refresh_sign_verify_round_trip() {
        let claims = RefreshClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_refresh(&claims).unwrap();
        let verified = codec().verify_refresh(&signed).unwrap();

        assert_eq!(claims, verified);
    }

    #[test]
    fn test_access_sign_verify_round_trip() {
        let claims = AccessClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_access(&claims).unwrap();
        let verified = codec().verify_access(&signed).unwrap();

        assert_eq!(claims, verified);
    }

    #[test]
    fn test_expired_credential_rejected() {
        let claims = RefreshClaims::new("user-1", "refresh-1", Utc::now().timestamp() - 10);
        let signed = codec().sign_refresh(&claims).unwrap();

        let err = codec().verify_refresh(&signed).unwrap_err();
        match err {
            TokenError::InvalidCredential { kind, reason } => {
                assert_eq!(kind, CredentialKind::Refresh);
                assert_eq!(reason, "expired");
            }
            other => panic!("expected InvalidCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = RefreshClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_refresh(&claims).unwrap();

        let other = TokenCodec::new(b"some-other-secret");
        assert!(matches!(
            other.verify_refresh(&signed),
            Err(TokenError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn test_algorithm_substitution_rejected() {
        // A token signed with HS256 over the same secret must not verify.
        let claims = RefreshClaims::new("user-1", "refresh-1", future_exp());
        let signed = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = codec().verify_refresh(&signed).unwrap_err();
        match err {
            TokenError::InvalidCredential { reason, .. } => {
                assert_eq!(reason, "unsupported signing algorithm");
            }
            other => panic!("expected InvalidCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let claims = RefreshClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_refresh(&claims).unwrap();

        // Flip one character inside the payload segment.
        let mut parts: Vec<String> = signed.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        let mid = payload.len() / 2;
        payload[mid] = if payload[mid] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(matches!(
            codec().verify_refresh(&tampered),
            Err(TokenError::InvalidCredential { .. })
        ));
    }

    #[test]
    fn test_access_token_does_not_verify_as_refresh() {
        let claims = AccessClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_access(&claims).unwrap();

        let err = codec().verify_refresh(&signed).unwrap_err();
        match err {
            TokenError::InvalidCredential { reason, .. } => {
                assert_eq!(reason, "unexpected claims shape");
            }
            other => panic!("expected InvalidCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_round_trip_is_byte_identical() {
        let claims = RefreshClaims::new("user-1", "refresh-1", future_exp());
        let signed = codec().sign_refresh(&claims).unwrap();

        let encoded = TokenCodec::encode_transport(&signed);
        let decoded = TokenCodec::decode_transport(&encoded).unwrap();

        assert_eq!(signed, decoded);
    }

    #[test]
    fn test_malformed_transport_is_a_distinct_error() {
        let err = TokenCodec::decode_transport("%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, TokenError::MalformedEncoding(_)));
    }
}
