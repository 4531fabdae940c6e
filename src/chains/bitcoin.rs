//! Bitcoin: P2PKH, Base58Check(version || RIPEMD160(SHA256(compressed public key))).

use k256::ecdsa::SigningKey;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Upper bound of a Base58Check P2PKH address. Leading zero bytes in the
/// hash shorten the encoding.
pub const ADDRESS_LEN: usize = 34;

/// Shortest possible P2PKH encoding
const MIN_ADDRESS_LEN: usize = 26;

#[cfg(feature = "bitcoin")]
const VERSION: u8 = 0x00;

#[cfg(feature = "bitcoin")]
pub(crate) fn encode(key: &SigningKey) -> String {
    p2pkh(key, VERSION)
}

#[cfg(feature = "bitcoin")]
pub(crate) fn validate(address: &str) -> Result<(), String> {
    validate_p2pkh(address, VERSION)
}

/// HASH160 of the SEC1 compressed public key.
pub(crate) fn hash160(key: &SigningKey) -> [u8; 20] {
    let public_key = key.verifying_key().to_encoded_point(true);
    let sha = Sha256::digest(public_key.as_bytes());
    Ripemd160::digest(sha).into()
}

pub(crate) fn p2pkh(key: &SigningKey, version: u8) -> String {
    bs58::encode(hash160(key))
        .with_check_version(version)
        .into_string()
}

pub(crate) fn validate_p2pkh(address: &str, version: u8) -> Result<(), String> {
    if !(MIN_ADDRESS_LEN..=ADDRESS_LEN).contains(&address.len()) {
        return Err(format!(
            "expected {MIN_ADDRESS_LEN} to {ADDRESS_LEN} characters, got {}",
            address.len()
        ));
    }
    let decoded = bs58::decode(address)
        .with_check(Some(version))
        .into_vec()
        .map_err(|e| e.to_string())?;
    if decoded.len() != 21 {
        return Err(format!("expected a 21-byte payload, got {}", decoded.len()));
    }
    Ok(())
}
