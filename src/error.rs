use thiserror::Error;

/// Which of the two presented credentials failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Access,
    Refresh,
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialKind::Access => write!(f, "access"),
            CredentialKind::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("malformed transport encoding: {0}")]
    MalformedEncoding(String),

    #[error("{kind} credential invalid: {reason}")]
    InvalidCredential {
        kind: CredentialKind,
        reason: String,
    },

    #[error("access credential is not bound to the presented refresh credential")]
    CredentialMismatch,

    #[error("refresh credential is unknown or already consumed")]
    UnknownOrConsumed,

    #[error("there is no such user")]
    UserNotFound,

    #[error("there is no such refresh credential for this user")]
    RecordNotFound,

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("hashing failure: {0}")]
    Hashing(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TokenError {
    pub fn config(msg: impl Into<String>) -> Self {
        TokenError::Config(msg.into())
    }

    pub fn invalid_credential(kind: CredentialKind, reason: impl Into<String>) -> Self {
        TokenError::InvalidCredential {
            kind,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::MalformedEncoding(_) => "MALFORMED_ENCODING",
            TokenError::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            TokenError::CredentialMismatch => "CREDENTIAL_MISMATCH",
            TokenError::UnknownOrConsumed => "UNKNOWN_OR_CONSUMED_CREDENTIAL",
            TokenError::UserNotFound | TokenError::RecordNotFound => "NOT_FOUND",
            TokenError::Persistence(_) => "PERSISTENCE_FAILURE",
            TokenError::Hashing(_) => "HASHING_FAILURE",
            TokenError::Config(_) => "CONFIG_ERROR",
            TokenError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<redis::RedisError> for TokenError {
    fn from(err: redis::RedisError) -> Self {
        TokenError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            TokenError::UnknownOrConsumed.code(),
            "UNKNOWN_OR_CONSUMED_CREDENTIAL"
        );
        assert_eq!(TokenError::UserNotFound.code(), "NOT_FOUND");
        assert_eq!(TokenError::RecordNotFound.code(), "NOT_FOUND");
        assert_eq!(
            TokenError::invalid_credential(CredentialKind::Refresh, "expired").code(),
            "INVALID_CREDENTIAL"
        );
    }

    #[test]
    fn test_invalid_credential_display_names_the_credential() {
        let err = TokenError::invalid_credential(CredentialKind::Access, "signature mismatch");
        assert_eq!(
            err.to_string(),
            "access credential invalid: signature mismatch"
        );
    }
}
