//! Password-based key derivation (scrypt).

use crate::crypto_config::*;
use crate::error::{KeystoreError, Result};
use crate::kdf_config::{validate_cost, KdfConfig};
use scrypt::{scrypt, Params as ScryptParams};
use tracing::debug;
use zeroize::Zeroizing;

/// Scrypt parameters as persisted in a keystore record.
///
/// These are fixed when the keystore is generated and stored verbatim, so the
/// same key can be re-derived from the password later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    pub(crate) dklen: u32,
    pub(crate) n: u32,
    pub(crate) r: u32,
    pub(crate) p: u32,
    pub(crate) salt: [u8; SALT_SIZE],
}

impl KdfParams {
    /// Pairs a configuration with the salt drawn for one keystore.
    pub fn new(config: KdfConfig, salt: [u8; SALT_SIZE]) -> Self {
        KdfParams {
            dklen: config.dklen,
            n: config.n,
            r: config.r,
            p: config.p,
            salt,
        }
    }

    #[inline]
    #[must_use]
    pub fn dklen(&self) -> u32 {
        self.dklen
    }

    #[inline]
    #[must_use]
    pub fn n(&self) -> u32 {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn r(&self) -> u32 {
        self.r
    }

    #[inline]
    #[must_use]
    pub fn p(&self) -> u32 {
        self.p
    }

    #[inline]
    #[must_use]
    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    /// Re-derives the keystore key from `password` using the stored parameters.
    pub fn derive(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if self.dklen as usize != DERIVED_KEY_SIZE {
            return Err(KeystoreError::InvalidKdfParams(format!(
                "Keystore dklen must be {DERIVED_KEY_SIZE}, got {}",
                self.dklen
            )));
        }
        derive_key(
            password,
            &self.salt,
            self.n,
            self.r,
            self.p,
            self.dklen as usize,
        )
    }
}

/// Derives a key of `out_key_len` bytes from `password` and `salt` with scrypt.
///
/// # Errors
///
/// - [`KeystoreError::InvalidKdfParams`] for an empty password, an empty or
///   all-zero salt, a cost factor that is zero, not a power of two or below
///   the minimum, a zero `block_r`/`parallel_p`, or an output length scrypt
///   does not accept. Nothing is clamped.
/// - [`KeystoreError::AllocationFailure`] if the parameters would need more
///   working memory than the crate allows.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    cost_n: u32,
    block_r: u32,
    parallel_p: u32,
    out_key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if password.is_empty() {
        return Err(KeystoreError::InvalidKdfParams(
            "Password must not be empty".into(),
        ));
    }
    if salt.is_empty() || salt.iter().all(|b| *b == 0) {
        return Err(KeystoreError::InvalidKdfParams(
            "Salt must be non-empty and not all zeros".into(),
        ));
    }
    validate_cost(cost_n, block_r, parallel_p)?;

    let log_n = cost_n.trailing_zeros() as u8;
    let params = ScryptParams::new(log_n, block_r, parallel_p, out_key_len)
        .map_err(|e| KeystoreError::InvalidKdfParams(format!("Invalid scrypt params: {e}")))?;

    debug!(
        n = cost_n,
        r = block_r,
        p = parallel_p,
        dklen = out_key_len,
        "running scrypt"
    );

    let mut key = Zeroizing::new(vec![0u8; out_key_len]);
    scrypt(password, salt, &params, &mut key)
        .map_err(|e| KeystoreError::InvalidKdfParams(format!("Scrypt derivation failed: {e}")))?;

    Ok(key)
}
