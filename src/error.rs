use crate::chains::Network;
use crate::keys::Curve;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    #[error("Invalid key or IV: {0}")]
    InvalidKeyOrIv(String),

    #[error("MAC verification failed: wrong password or corrupted keystore")]
    IntegrityFailure,

    #[error("Unsupported key for {network}: {reason}")]
    UnsupportedKeyForNetwork { network: Network, reason: String },

    #[error("Unknown network ({0}); expected an id between 0 and 6")]
    UnknownNetwork(u32),

    #[error("Network {0} is not enabled; rebuild with the `{0}` feature")]
    NetworkNotEnabled(Network),

    #[error("Secure random source unavailable: {0}")]
    RandomnessFailure(String),

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),

    #[error("Invalid key material for {curve}: {reason}")]
    InvalidKey { curve: Curve, reason: String },

    #[error("Invalid {network} address: {reason}")]
    InvalidAddress { network: Network, reason: String },

    #[error("Decrypted key does not match the stored address")]
    AddressMismatch,

    #[error("Invalid buffer for {field}: expected {expected} bytes, got {actual}")]
    InvalidBuffer {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Null pointer passed for {0}")]
    NullPointer(&'static str),

    #[error("Internal panic: {0}")]
    Panicked(String),

    #[error("Unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("Unsupported KDF type: {0}")]
    UnsupportedKdf(String),

    #[error("Keystore version {0} not supported")]
    UnsupportedVersion(u32),

    #[error("Hex decode error: {0}")]
    HexError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KeystoreError>;
