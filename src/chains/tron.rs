//! Tron: Base58Check of 0x41 followed by the same Keccak256 account hash Ethereum uses.

use super::keccak_account;
use k256::ecdsa::SigningKey;

/// Base58Check of 25 bytes starting with 0x41 always encodes to 34 characters
pub const ADDRESS_LEN: usize = 34;

const VERSION: u8 = 0x41;

pub(crate) fn encode(key: &SigningKey) -> String {
    bs58::encode(keccak_account(key))
        .with_check_version(VERSION)
        .into_string()
}

pub(crate) fn validate(address: &str) -> Result<(), String> {
    if address.len() != ADDRESS_LEN {
        return Err(format!(
            "expected {ADDRESS_LEN} characters, got {}",
            address.len()
        ));
    }
    let decoded = bs58::decode(address)
        .with_check(Some(VERSION))
        .into_vec()
        .map_err(|e| e.to_string())?;
    if decoded.len() != 21 {
        return Err(format!("expected a 21-byte payload, got {}", decoded.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn addresses_start_with_t() {
        let key = SigningKey::random(&mut thread_rng());
        let address = encode(&key);
        assert_eq!(address.len(), ADDRESS_LEN);
        assert!(address.starts_with('T'));
        assert!(validate(&address).is_ok());
    }

    #[test]
    fn payload_is_the_keccak_account() {
        let key = SigningKey::random(&mut thread_rng());
        let decoded = bs58::decode(encode(&key))
            .with_check(Some(VERSION))
            .into_vec()
            .unwrap();
        assert_eq!(decoded[0], VERSION);
        assert_eq!(&decoded[1..], &keccak_account(&key));
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let key = SigningKey::random(&mut thread_rng());
        let mut address = encode(&key).into_bytes();
        let last = address.len() - 1;
        address[last] = if address[last] == b'1' { b'2' } else { b'1' };
        assert!(validate(std::str::from_utf8(&address).unwrap()).is_err());
    }
}
