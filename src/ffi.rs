//! C ABI over [`Keystore`](crate::Keystore) generation.
//!
//! Every output buffer is owned by the caller and must be exactly the size
//! given by the `*_LEN` constants, which include the trailing NUL. Nothing is
//! written unless the whole keystore was generated and encoded. On failure
//! the functions return a message that must be released with
//! [`free_cstring`]. On success they return NULL.

use crate::chains::Network;
use crate::error::{KeystoreError, Result};
use crate::kdf_config::KdfConfig;
use crate::keystore::Keystore;
use std::ffi::{c_char, CString};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use tracing::warn;

pub const CIPHER_LEN: usize = 11 + 1;
pub const IV_LEN: usize = 32 + 1;
pub const CIPHERTEXT_LEN: usize = 64 + 1;
pub const KDF_LEN: usize = 6 + 1;
pub const SALT_LEN: usize = 32 + 1;
pub const MAC_LEN: usize = 64 + 1;

pub const APTOS_ADDRESS_LEN: usize = 64 + 1;
pub const BITCOIN_ADDRESS_LEN: usize = 34 + 1;
pub const ETHEREUM_ADDRESS_LEN: usize = 40 + 1;
pub const LITECOIN_ADDRESS_LEN: usize = BITCOIN_ADDRESS_LEN;
pub const SOLANA_ADDRESS_LEN: usize = 44 + 1;
pub const SUI_ADDRESS_LEN: usize = 64 + 1;
pub const TRON_ADDRESS_LEN: usize = 34 + 1;

/// Address buffer size for `network`, NUL included.
#[must_use]
pub const fn address_buffer_len(network: Network) -> usize {
    match network {
        Network::Aptos => APTOS_ADDRESS_LEN,
        Network::Bitcoin => BITCOIN_ADDRESS_LEN,
        Network::Ethereum => ETHEREUM_ADDRESS_LEN,
        Network::Litecoin => LITECOIN_ADDRESS_LEN,
        Network::Solana => SOLANA_ADDRESS_LEN,
        Network::Sui => SUI_ADDRESS_LEN,
        Network::Tron => TRON_ADDRESS_LEN,
    }
}

/// Caller-owned writable buffer of `len` bytes, NUL included.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SizedStr {
    pub ptr: *mut c_char,
    pub len: usize,
}

/// Caller-owned read-only bytes. `len` is the exact number of bytes read.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SizedStrConst {
    pub ptr: *const c_char,
    pub len: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CipherParamsFfi {
    pub iv: SizedStr,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct KdfParamsFfi {
    pub dklen: *mut usize,
    pub n: *mut u32,
    pub r: *mut u32,
    pub p: *mut u32,
    pub salt: SizedStr,
}

/// Output record, laid out as the `keystore` struct of `ksgen.h`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct KeystoreFfi {
    pub cipher: SizedStr,
    pub cipherparams: CipherParamsFfi,
    pub ciphertext: SizedStr,
    pub kdf: SizedStr,
    pub kdfparams: KdfParamsFfi,
    pub mac: SizedStr,
}

fn non_null<T>(ptr: *const T, field: &'static str) -> Result<()> {
    if ptr.is_null() {
        return Err(KeystoreError::NullPointer(field));
    }
    Ok(())
}

impl SizedStr {
    fn validate(&self, expected: usize, field: &'static str) -> Result<()> {
        non_null(self.ptr, field)?;
        if self.len != expected {
            return Err(KeystoreError::InvalidBuffer {
                field,
                expected,
                actual: self.len,
            });
        }
        Ok(())
    }

    /// Writes `content` followed by a NUL.
    ///
    /// # Safety
    ///
    /// `self` must have passed [`SizedStr::validate`] with
    /// `content.len() + 1` and point to `self.len` writable bytes.
    unsafe fn write(&self, content: &[u8]) {
        debug_assert_eq!(content.len() + 1, self.len);
        let out = self.ptr.cast::<u8>();
        ptr::copy_nonoverlapping(content.as_ptr(), out, content.len());
        *out.add(content.len()) = 0;
    }
}

impl SizedStrConst {
    /// # Safety
    ///
    /// `ptr` must be valid for `len` bytes for the lifetime of the borrow.
    unsafe fn as_bytes(&self) -> Result<&[u8]> {
        non_null(self.ptr, "password")?;
        if self.len == 0 {
            return Err(KeystoreError::InvalidKdfParams(
                "Password must not be empty".into(),
            ));
        }
        Ok(std::slice::from_raw_parts(self.ptr.cast::<u8>(), self.len))
    }
}

impl KeystoreFfi {
    fn validate(&self) -> Result<()> {
        self.cipher.validate(CIPHER_LEN, "cipher")?;
        self.cipherparams.iv.validate(IV_LEN, "iv")?;
        self.ciphertext.validate(CIPHERTEXT_LEN, "ciphertext")?;
        self.kdf.validate(KDF_LEN, "kdf")?;
        non_null(self.kdfparams.dklen, "dklen")?;
        non_null(self.kdfparams.n, "n")?;
        non_null(self.kdfparams.r, "r")?;
        non_null(self.kdfparams.p, "p")?;
        self.kdfparams.salt.validate(SALT_LEN, "salt")?;
        self.mac.validate(MAC_LEN, "mac")?;
        Ok(())
    }
}

/// Hex and text renderings of a keystore, ready to be copied out.
struct Encoded {
    iv: String,
    ciphertext: String,
    salt: String,
    mac: String,
    address: Vec<u8>,
}

impl Encoded {
    fn new(keystore: &Keystore) -> Self {
        let record = keystore.record();
        Encoded {
            iv: hex::encode(record.iv()),
            ciphertext: hex::encode(record.ciphertext()),
            salt: hex::encode(record.kdfparams().salt()),
            mac: hex::encode(record.mac()),
            address: keystore.address().to_padded_bytes(),
        }
    }
}

/// # Safety
///
/// Same contract as [`init_keystore`].
unsafe fn generate_into(
    record: *mut KeystoreFfi,
    address: SizedStr,
    network_id: u32,
    password: SizedStrConst,
    config: KdfConfig,
) -> Result<()> {
    let record = record.as_ref().ok_or(KeystoreError::NullPointer("keystore"))?;
    record.validate()?;
    let password = password.as_bytes()?;
    let network = Network::from_id(network_id)?;
    address.validate(address_buffer_len(network), "address")?;

    let keystore = Keystore::new_with_config(network, password, config)?;
    let encoded = Encoded::new(&keystore);
    let params = keystore.record().kdfparams();

    record.cipher.write(keystore.record().cipher().as_bytes());
    record.cipherparams.iv.write(encoded.iv.as_bytes());
    record.ciphertext.write(encoded.ciphertext.as_bytes());
    record.kdf.write(keystore.record().kdf().as_bytes());
    *record.kdfparams.dklen = params.dklen() as usize;
    *record.kdfparams.n = params.n();
    *record.kdfparams.r = params.r();
    *record.kdfparams.p = params.p();
    record.kdfparams.salt.write(encoded.salt.as_bytes());
    record.mac.write(encoded.mac.as_bytes());
    address.write(&encoded.address);

    Ok(())
}

/// Runs `f`, turning a panic into [`KeystoreError::Panicked`] so it never
/// unwinds across the C boundary.
fn catch_panic<F: FnOnce() -> Result<()>>(f: F) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".into());
        Err(KeystoreError::Panicked(reason))
    })
}

fn into_message(result: Result<()>) -> *mut c_char {
    match result {
        Ok(()) => ptr::null_mut(),
        Err(e) => {
            warn!(error = %e, "keystore generation failed");
            let message = e.to_string().replace('\0', " ");
            CString::new(message).unwrap_or_default().into_raw()
        }
    }
}

/// Generates a keystore with scrypt N=2^13, r=8, p=8 into caller-owned buffers.
///
/// Returns NULL on success, or an error message to release with
/// [`free_cstring`].
///
/// # Safety
///
/// - `record` is NULL or points to a `KeystoreFfi` whose buffers are valid for
///   writes of their declared lengths and whose `kdfparams` pointers are
///   valid for writes.
/// - `address.ptr` is valid for `address.len` writable bytes.
/// - `password.ptr` is valid for `password.len` readable bytes.
/// - No output buffer overlaps another or the password.
#[no_mangle]
pub unsafe extern "C" fn init_keystore(
    record: *mut KeystoreFfi,
    address: SizedStr,
    network_id: u32,
    password: SizedStrConst,
) -> *mut c_char {
    into_message(catch_panic(|| {
        generate_into(record, address, network_id, password, KdfConfig::default())
    }))
}

/// [`init_keystore`] with explicit scrypt parameters. N must be a power of
/// two of at least 16; r and p must be non-zero, and scrypt's working set
/// must stay under 2 GiB.
///
/// # Safety
///
/// Same contract as [`init_keystore`].
#[no_mangle]
pub unsafe extern "C" fn init_keystore_with_kdf(
    record: *mut KeystoreFfi,
    address: SizedStr,
    network_id: u32,
    password: SizedStrConst,
    n: u32,
    r: u32,
    p: u32,
) -> *mut c_char {
    into_message(catch_panic(|| {
        generate_into(record, address, network_id, password, KdfConfig::with_cost(n, r, p))
    }))
}

/// Releases a message returned by [`init_keystore`] or
/// [`init_keystore_with_kdf`]. NULL is ignored.
///
/// # Safety
///
/// `message` must be NULL or a pointer returned by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn free_cstring(message: *mut c_char) {
    if !message.is_null() {
        drop(CString::from_raw(message));
    }
}
