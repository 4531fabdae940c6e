//! Cryptographic configuration constants for keystores
//!
//! This module centralizes all cryptographic parameters used in keystore
//! encryption and key derivation.

/// AES cipher mode used for keystore encryption
pub(crate) const CIPHER_NAME: &str = "aes-128-ctr";

/// Key derivation function recorded in the keystore
pub(crate) const KDF_NAME: &str = "scrypt";

/// Size of the private key encrypted into every keystore
pub(crate) const PRIVATE_KEY_SIZE: usize = 32;

/// Size of derived key in bytes (encryption key followed by MAC key)
pub(crate) const DERIVED_KEY_SIZE: usize = 32;

/// Size of initialization vector for AES-CTR
pub(crate) const IV_SIZE: usize = 16;

/// Size of the scrypt salt
pub(crate) const SALT_SIZE: usize = 16;

/// Size of encryption key portion (first 16 bytes of derived key)
pub(crate) const ENCRYPTION_KEY_SIZE: usize = 16;

/// Size of MAC key portion (last 16 bytes of derived key)
pub(crate) const MAC_KEY_SIZE: usize = 16;

/// Keccak256 output size
pub(crate) const MAC_SIZE: usize = 32;

/// Smallest accepted scrypt cost factor (N)
pub(crate) const MIN_SCRYPT_N: u32 = 16;

/// Upper bound on the `128 * r * N` working set scrypt may allocate
pub(crate) const MAX_SCRYPT_MEMORY: u64 = 2 * 1024 * 1024 * 1024;

// Scrypt parameters with production/test variants
#[cfg(not(any(test, feature = "test-utils")))]
pub(crate) const DEFAULT_KDF_PARAMS_LOG_N: u8 = 13; // N = 8192 (production)

#[cfg(any(test, feature = "test-utils"))]
pub(crate) const DEFAULT_KDF_PARAMS_LOG_N: u8 = 4; // N = 16 (fast for tests)

/// Scrypt r parameter (block size)
pub(crate) const DEFAULT_KDF_PARAMS_R: u32 = 8;

/// Scrypt p parameter (parallelization)
pub(crate) const DEFAULT_KDF_PARAMS_P: u32 = 8;
