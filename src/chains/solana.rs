//! Solana: the Ed25519 public key in Base58.

use ed25519_dalek::SigningKey;

/// Upper bound of a Base58-encoded 32-byte key
pub const ADDRESS_LEN: usize = 44;

const MIN_ADDRESS_LEN: usize = 32;

/// Size of Ed25519 public key in bytes
const PUBLIC_KEY_SIZE: usize = 32;

pub(crate) fn encode(key: &SigningKey) -> String {
    bs58::encode(key.verifying_key().as_bytes()).into_string()
}

pub(crate) fn validate(address: &str) -> Result<(), String> {
    if !(MIN_ADDRESS_LEN..=ADDRESS_LEN).contains(&address.len()) {
        return Err(format!(
            "expected {MIN_ADDRESS_LEN} to {ADDRESS_LEN} characters, got {}",
            address.len()
        ));
    }
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| e.to_string())?;
    if decoded.len() != PUBLIC_KEY_SIZE {
        return Err(format!(
            "expected a {PUBLIC_KEY_SIZE}-byte public key, got {}",
            decoded.len()
        ));
    }
    Ok(())
}
