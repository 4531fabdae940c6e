//! AES-128-CTR encryption of the private key.

use crate::crypto_config::{ENCRYPTION_KEY_SIZE, IV_SIZE};
use crate::error::{KeystoreError, Result};
use crate::mac::verify_mac;
use aes::cipher::{KeyIvInit, StreamCipher};
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

fn keystream(key: &[u8], iv: &[u8]) -> Result<Aes128Ctr> {
    if key.len() != ENCRYPTION_KEY_SIZE {
        return Err(KeystoreError::InvalidKeyOrIv(format!(
            "Expected a {ENCRYPTION_KEY_SIZE}-byte key, got {}",
            key.len()
        )));
    }
    if iv.len() != IV_SIZE {
        return Err(KeystoreError::InvalidKeyOrIv(format!(
            "Expected a {IV_SIZE}-byte IV, got {}",
            iv.len()
        )));
    }
    Aes128Ctr::new_from_slices(key, iv).map_err(|e| KeystoreError::InvalidKeyOrIv(e.to_string()))
}

/// Encrypts `plaintext` under `key` and `iv`.
///
/// The ciphertext has exactly the plaintext's length.
///
/// # Errors
///
/// [`KeystoreError::InvalidKeyOrIv`] if the key or IV is not 16 bytes; no
/// encryption is attempted in that case.
pub fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut cipher = keystream(key, iv)?;
    let mut ciphertext = plaintext.to_vec();
    cipher.apply_keystream(&mut ciphertext);
    Ok(ciphertext)
}

/// Verifies `expected_mac` over `ciphertext`, then decrypts it.
///
/// # Errors
///
/// - [`KeystoreError::IntegrityFailure`] if the MAC does not match. The
///   ciphertext is never decrypted in that case.
/// - [`KeystoreError::InvalidKeyOrIv`] for a malformed key or IV.
pub fn decrypt(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    mac_key: &[u8],
    expected_mac: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let mut cipher = keystream(key, iv)?;
    verify_mac(mac_key, ciphertext, expected_mac)?;

    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}
