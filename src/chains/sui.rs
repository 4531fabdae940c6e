//! Sui: BLAKE2b-256 over the Ed25519 flag byte 0x00 followed by the public
//! key, rendered as 64 hex characters.

use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::SigningKey;

type Blake2b256 = Blake2b<U32>;

pub const ADDRESS_LEN: usize = 64;

const ED25519_FLAG: u8 = 0x00;

pub(crate) fn encode(key: &SigningKey) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(key.verifying_key().as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn validate(address: &str) -> Result<(), String> {
    super::validate_hex_account(address, ADDRESS_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_prepends_flag_byte() {
        let key = SigningKey::from_bytes(&[5u8; 32]);
        let mut preimage = vec![0x00];
        preimage.extend_from_slice(key.verifying_key().as_bytes());

        let address = encode(&key);
        assert_eq!(address, hex::encode(Blake2b256::digest(&preimage)));
        assert!(validate(&address).is_ok());
    }

    #[test]
    fn rejects_uppercase_hex() {
        let key = SigningKey::from_bytes(&[5u8; 32]);
        assert!(validate(&encode(&key).to_uppercase()).is_err());
    }
}
