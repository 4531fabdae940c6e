//! Ethereum: EIP-55 checksummed hex of the Keccak256 account hash.

use super::keccak_account;
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};

/// 20-byte account rendered as 40 hex characters, without the `0x` prefix
pub const ADDRESS_LEN: usize = 40;

pub(crate) fn encode(key: &SigningKey) -> String {
    to_checksum(&hex::encode(keccak_account(key)))
}

/// Applies the EIP-55 mixed-case checksum to a lowercase hex account.
fn to_checksum(lower_hex: &str) -> String {
    let hash = Keccak256::digest(lower_hex.as_bytes());

    lower_hex
        .char_indices()
        .map(|(i, c)| {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// Returns the EIP-55 form of `address`.
///
/// All-lowercase and all-uppercase addresses carry no checksum and are
/// accepted; mixed case must match EIP-55.
pub(crate) fn validate(address: &str) -> Result<String, String> {
    if address.len() != ADDRESS_LEN {
        return Err(format!(
            "expected {ADDRESS_LEN} hex characters, got {}",
            address.len()
        ));
    }
    if !address.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("contains non-hex characters".into());
    }

    let lower = address.to_ascii_lowercase();
    let checksummed = to_checksum(&lower);
    if address == lower || address == address.to_ascii_uppercase() {
        return Ok(checksummed);
    }
    if checksummed != address {
        return Err("EIP-55 checksum mismatch".into());
    }
    Ok(checksummed)
}
