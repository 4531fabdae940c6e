//! # ksgen
//!
//! Encrypted keystore generator for Aptos, Bitcoin, Ethereum, Litecoin,
//! Solana, Sui and Tron accounts, in the Web3 Secret Storage v3 layout
//! (scrypt, AES-128-CTR, Keccak-256 MAC).
//!
//! The same generator is exposed to C through [`ffi`], writing into
//! caller-owned fixed-size buffers.
//!
//! ## Example
//!
//! ```
//! use ksgen::{KdfConfig, Keystore, Network};
//!
//! // Use fast KDF for doctests
//! let keystore = Keystore::new_with_config(
//!     Network::Bitcoin,
//!     "my_password",
//!     KdfConfig::custom_scrypt(4, 8, 1),
//! ).unwrap();
//!
//! println!("Bitcoin address: {}", keystore.address());
//! let json = keystore.to_json().unwrap();
//!
//! let loaded = Keystore::from_json(&json).unwrap();
//! assert!(loaded.decrypt_key("my_password").is_ok());
//! ```

pub mod chains;
pub mod cipher;
mod crypto_config;
pub mod error;
pub mod ffi;
pub mod kdf;
mod kdf_config;
pub mod keys;
pub mod keystore;
pub mod mac;

pub use chains::{derive_address, Address, Network};
pub use error::{KeystoreError, Result};
pub use kdf::KdfParams;
pub use kdf_config::KdfConfig;
pub use keys::{Curve, PrivateKey};
pub use keystore::{init_keystore, Keystore, KeystoreBuilder, KeystoreRecord, VERSION_3};
