//! Admin password held as a SHA-256 digest.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{AdminError, Result};

const DIGEST_LEN: usize = 32;

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// The configured admin secret. The plain password is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSecret {
    digest: [u8; DIGEST_LEN],
}

impl AdminSecret {
    /// Hashes a plain password.
    pub fn from_password(password: &str) -> Self {
        Self {
            digest: Sha256::digest(password.as_bytes()).into(),
        }
    }

    /// Parses a hex digest as produced by [`sha256_hex`].
    pub fn from_hex(digest: &str) -> Result<Self> {
        let bytes = hex::decode(digest.trim()).map_err(|err| AdminError::InvalidSecret {
            reason: err.to_string(),
        })?;
        let digest: [u8; DIGEST_LEN] =
            bytes
                .try_into()
                .map_err(|bytes: Vec<u8>| AdminError::InvalidSecret {
                    reason: format!("expected {DIGEST_LEN} bytes, got {}", bytes.len()),
                })?;
        Ok(Self { digest })
    }

    /// Checks a password attempt.
    ///
    /// Compares every digest byte regardless of where the first difference
    /// is.
    pub fn verify(&self, attempt: &str) -> bool {
        let candidate: [u8; DIGEST_LEN] = Sha256::digest(attempt.as_bytes()).into();
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminSecret([REDACTED])")
    }
}
