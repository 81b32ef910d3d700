//! Token/credential store.
//!
//! Grounded on the teacher's `auth::AuthService::verify_api_key`, but fixing
//! its commented-out expiry check and its `DefaultHasher`-based key hash
//! (brute-forceable, not constant-time). The kernel never issues or
//! transports raw secrets — it stores a pre-hashed secret and validates a
//! caller-supplied hash against it in constant time.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::error::{ErrorKind, KernelError};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

#[derive(Debug, Clone)]
pub struct Credential {
    pub token_id: String,
    pub secret_hash: Vec<u8>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Keyed by `token_id`. One entry per issued credential, guarded by a single
/// mutex so `store` and `validate` always see a consistent state.
pub struct CredentialStore {
    credentials: Mutex<HashMap<String, Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            credentials: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(
        &self,
        token_id: &str,
        secret_hash: Vec<u8>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), KernelError> {
        let mut credentials = self.credentials.lock();
        if credentials.contains_key(token_id) {
            return Err(KernelError::new(
                ErrorKind::AlreadyRegistered,
                format!("credential {token_id} already stored"),
            ));
        }
        credentials.insert(
            token_id.to_string(),
            Credential {
                token_id: token_id.to_string(),
                secret_hash,
                issued_at,
                expires_at,
                revoked: false,
            },
        );
        Ok(())
    }

    /// Validates `token_id`/`candidate_hash` against the stored credential.
    /// Checks expiry and revocation, and compares the hash in constant time
    /// so a mismatching prefix cannot be timed out of a valid one.
    pub fn validate(
        &self,
        token_id: &str,
        candidate_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), KernelError> {
        let credentials = self.credentials.lock();
        let entry = credentials
            .get(token_id)
            .ok_or_else(|| KernelError::new(ErrorKind::Unauthorized, "unknown credential"))?;

        if entry.revoked {
            return Err(KernelError::new(ErrorKind::Unauthorized, "credential revoked"));
        }
        if now >= entry.expires_at {
            return Err(KernelError::new(ErrorKind::Unauthorized, "credential expired"));
        }

        let matches: bool = entry.secret_hash.ct_eq(candidate_hash).into();
        if !matches {
            return Err(KernelError::new(ErrorKind::Unauthorized, "credential mismatch"));
        }
        Ok(())
    }

    pub fn revoke(&self, token_id: &str) -> Result<(), KernelError> {
        let mut credentials = self.credentials.lock();
        let entry = credentials
            .get_mut(token_id)
            .ok_or_else(|| KernelError::new(ErrorKind::Unauthorized, "unknown credential"))?;
        entry.revoked = true;
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
