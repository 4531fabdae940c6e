//! Aptos: SHA3-256 over the Ed25519 public key followed by the single-signer
//! scheme byte 0x00, rendered as 64 hex characters.

use ed25519_dalek::SigningKey;
use sha3::{Digest, Sha3_256};

pub const ADDRESS_LEN: usize = 64;

const ED25519_SCHEME: u8 = 0x00;

pub(crate) fn encode(key: &SigningKey) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(key.verifying_key().as_bytes());
    hasher.update([ED25519_SCHEME]);
    hex::encode(hasher.finalize())
}

pub(crate) fn validate(address: &str) -> Result<(), String> {
    super::validate_hex_account(address, ADDRESS_LEN)
}
