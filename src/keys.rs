//! Private keys for the two curves the supported networks use.

use crate::crypto_config::PRIVATE_KEY_SIZE;
use crate::error::{KeystoreError, Result};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Signature curve a network derives its public keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Bitcoin, Ethereum, Litecoin, Tron
    Secp256k1,
    /// Aptos, Solana, Sui
    Ed25519,
}

impl Curve {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::Ed25519 => "ed25519",
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte private key on one of the supported curves.
///
/// Both variants wipe their secret material on drop.
#[derive(Clone)]
pub enum PrivateKey {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl PrivateKey {
    /// Generates a fresh key for `curve` from a cryptographically secure RNG.
    ///
    /// secp256k1 keys are rejection-sampled: candidates outside the curve order
    /// are discarded and redrawn.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::RandomnessFailure`] if the RNG cannot produce bytes.
    pub fn generate<R: RngCore + CryptoRng>(curve: Curve, rng: &mut R) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        loop {
            rng.try_fill_bytes(bytes.as_mut_slice())
                .map_err(|e| KeystoreError::RandomnessFailure(e.to_string()))?;

            match curve {
                Curve::Ed25519 => {
                    return Ok(PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(
                        &bytes,
                    )))
                }
                Curve::Secp256k1 => {
                    if let Ok(key) = k256::ecdsa::SigningKey::from_slice(bytes.as_slice()) {
                        return Ok(PrivateKey::Secp256k1(key));
                    }
                }
            }
        }
    }

    /// Rebuilds a key from its 32-byte encoding.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::InvalidKey`] if `bytes` is not 32 bytes long, or for
    /// secp256k1, is zero or not below the curve order.
    pub fn from_bytes(curve: Curve, bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| KeystoreError::InvalidKey {
                curve,
                reason: format!("Expected {PRIVATE_KEY_SIZE} bytes, got {}", bytes.len()),
            })?;

        match curve {
            Curve::Secp256k1 => k256::ecdsa::SigningKey::from_slice(bytes)
                .map(PrivateKey::Secp256k1)
                .map_err(|e| KeystoreError::InvalidKey {
                    curve,
                    reason: format!("Invalid secp256k1 key: {e}"),
                }),
            Curve::Ed25519 => Ok(PrivateKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(
                bytes,
            ))),
        }
    }

    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            PrivateKey::Secp256k1(_) => Curve::Secp256k1,
            PrivateKey::Ed25519(_) => Curve::Ed25519,
        }
    }

    /// The 32 secret bytes that get encrypted into the keystore.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        match self {
            PrivateKey::Secp256k1(key) => Zeroizing::new(key.to_bytes().into()),
            PrivateKey::Ed25519(key) => Zeroizing::new(key.to_bytes()),
        }
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve())
            .finish_non_exhaustive()
    }
}
