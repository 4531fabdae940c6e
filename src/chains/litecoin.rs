//! Litecoin: Bitcoin-style P2PKH with version byte 0x30 (`L...` addresses).

use super::bitcoin;
use k256::ecdsa::SigningKey;

pub const ADDRESS_LEN: usize = bitcoin::ADDRESS_LEN;

const VERSION: u8 = 0x30;

pub(crate) fn encode(key: &SigningKey) -> String {
    bitcoin::p2pkh(key, VERSION)
}

pub(crate) fn validate(address: &str) -> Result<(), String> {
    bitcoin::validate_p2pkh(address, VERSION)
}
