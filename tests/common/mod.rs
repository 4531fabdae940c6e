#![allow(dead_code)]

use ksgen::ffi::{
    address_buffer_len, CipherParamsFfi, KdfParamsFfi, KeystoreFfi, SizedStr, SizedStrConst,
    CIPHERTEXT_LEN, CIPHER_LEN, IV_LEN, KDF_LEN, MAC_LEN, SALT_LEN,
};
use ksgen::{KdfConfig, Network};
use serde_json::json;
use std::ffi::{c_char, CStr};

/// Standard test password for consistent testing
pub const TEST_PASSWORD: &str = "test_password_123";
pub const TEST_WRONG_PASSWORD: &str = "wrong_password_456";

/// Scrypt N=16: fast enough for every integration test
pub fn fast_config() -> KdfConfig {
    KdfConfig::custom_scrypt(4, 8, 1)
}

/// Networks compiled into this build
pub fn enabled_networks() -> impl Iterator<Item = Network> {
    Network::ALL.into_iter().filter(|n| n.is_enabled())
}

/// Asserts `text` is `len` lowercase hex characters.
pub fn assert_lower_hex(text: &str, len: usize) {
    assert_eq!(text.len(), len, "expected {len} hex characters: {text}");
    assert!(
        text.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)),
        "expected lowercase hex: {text}"
    );
}

/// Caller-side storage for one `keystore` record plus an address buffer,
/// prefilled with a sentinel byte so untouched buffers can be detected.
pub struct OutBuffers {
    pub cipher: Vec<u8>,
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub kdf: Vec<u8>,
    pub salt: Vec<u8>,
    pub mac: Vec<u8>,
    pub dklen: usize,
    pub n: u32,
    pub r: u32,
    pub p: u32,
    pub address: Vec<u8>,
}

pub const SENTINEL: u8 = 0xAA;
pub const SENTINEL_U32: u32 = 0xDEAD_BEEF;

impl OutBuffers {
    pub fn new(address_len: usize) -> Self {
        OutBuffers {
            cipher: vec![SENTINEL; CIPHER_LEN],
            iv: vec![SENTINEL; IV_LEN],
            ciphertext: vec![SENTINEL; CIPHERTEXT_LEN],
            kdf: vec![SENTINEL; KDF_LEN],
            salt: vec![SENTINEL; SALT_LEN],
            mac: vec![SENTINEL; MAC_LEN],
            dklen: SENTINEL_U32 as usize,
            n: SENTINEL_U32,
            r: SENTINEL_U32,
            p: SENTINEL_U32,
            address: vec![SENTINEL; address_len],
        }
    }

    pub fn for_network(network: Network) -> Self {
        Self::new(address_buffer_len(network))
    }

    pub fn record(&mut self) -> KeystoreFfi {
        KeystoreFfi {
            cipher: sized(&mut self.cipher),
            cipherparams: CipherParamsFfi {
                iv: sized(&mut self.iv),
            },
            ciphertext: sized(&mut self.ciphertext),
            kdf: sized(&mut self.kdf),
            kdfparams: KdfParamsFfi {
                dklen: &mut self.dklen,
                n: &mut self.n,
                r: &mut self.r,
                p: &mut self.p,
                salt: sized(&mut self.salt),
            },
            mac: sized(&mut self.mac),
        }
    }

    pub fn address(&mut self) -> SizedStr {
        sized(&mut self.address)
    }

    /// True if no byte or integer was written.
    pub fn untouched(&self) -> bool {
        [
            &self.cipher,
            &self.iv,
            &self.ciphertext,
            &self.kdf,
            &self.salt,
            &self.mac,
            &self.address,
        ]
        .iter()
        .all(|buf| buf.iter().all(|b| *b == SENTINEL))
            && self.dklen == SENTINEL_U32 as usize
            && [self.n, self.r, self.p].iter().all(|v| *v == SENTINEL_U32)
    }
}

pub fn sized(buf: &mut [u8]) -> SizedStr {
    SizedStr {
        ptr: buf.as_mut_ptr().cast(),
        len: buf.len(),
    }
}

pub fn sized_const(bytes: &[u8]) -> SizedStrConst {
    SizedStrConst {
        ptr: bytes.as_ptr().cast(),
        len: bytes.len(),
    }
}

/// Text before the first NUL.
pub fn c_text(buf: &[u8]) -> &str {
    CStr::from_bytes_until_nul(buf)
        .expect("buffer is not NUL-terminated")
        .to_str()
        .expect("buffer is not UTF-8")
}

/// Takes ownership of an error message returned over the C ABI.
pub fn take_message(message: *mut c_char) -> Option<String> {
    if message.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    unsafe { ksgen::ffi::free_cstring(message) };
    Some(text)
}

/// Keystore document with every field valid except the overridden ones.
pub fn keystore_json(overrides: serde_json::Value) -> String {
    let mut document = json!({
        "address": "7E5F4552091A69125d5DfCb7b8C2659029395Bdf",
        "crypto": {
            "cipher": "aes-128-ctr",
            "cipherparams": {
                "iv": "83dbcc02d8ccb40e466191a123791e0e"
            },
            "ciphertext": "d172bf743a674da9cdad04534d56926ef8358534d458fffccd4e6ad2fbde479c",
            "kdf": "scrypt",
            "kdfparams": {
                "dklen": 32,
                "n": 16,
                "p": 1,
                "r": 8,
                "salt": "ab0c7876052600dd703518d6fc3fe898"
            },
            "mac": "2103ac29920d71da29f15d75b4a16dbe95cfd7ff8faea1056c33131d846e3097"
        },
        "id": "3198bc9c-6672-4ab3-9995-4942343ae5b6",
        "version": 3,
        "chain": "ethereum"
    });
    merge(&mut document, overrides);
    document.to_string()
}

fn merge(target: &mut serde_json::Value, overrides: serde_json::Value) {
    match (target, overrides) {
        (serde_json::Value::Object(target), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(&key) {
                    Some(existing) if value.is_object() => merge(existing, value),
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, overrides) => *target = overrides,
    }
}

/// Helper to assert that an error matches a specific variant
#[macro_export]
macro_rules! assert_error_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            other => panic!(
                "Expected error variant {}, but got: {:?}",
                stringify!($pattern),
                other
            ),
        }
    };
}
