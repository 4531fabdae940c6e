//! Keystore integrity tag: Keccak256(mac_key || ciphertext), as in Web3 Secret Storage v3.

use crate::crypto_config::MAC_SIZE;
use crate::error::{KeystoreError, Result};
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;

/// Computes the MAC for `ciphertext` keyed by the second half of the derived key.
#[must_use]
pub fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; MAC_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(mac_key);
    hasher.update(ciphertext);
    hasher.finalize().into()
}

/// Recomputes the MAC and compares it with `expected` in constant time.
///
/// # Errors
///
/// [`KeystoreError::IntegrityFailure`] on any length or value mismatch.
pub fn verify_mac(mac_key: &[u8], ciphertext: &[u8], expected: &[u8]) -> Result<()> {
    let computed = compute_mac(mac_key, ciphertext);
    if expected.len() != MAC_SIZE || !bool::from(computed.as_slice().ct_eq(expected)) {
        tracing::warn!("keystore MAC verification failed");
        return Err(KeystoreError::IntegrityFailure);
    }
    Ok(())
}
