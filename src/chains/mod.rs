use crate::error::{KeystoreError, Result};
use crate::keys::{Curve, PrivateKey};
use serde::{Deserialize, Serialize};

#[cfg(feature = "aptos")]
pub mod aptos;
#[cfg(any(feature = "bitcoin", feature = "litecoin"))]
pub mod bitcoin;
#[cfg(feature = "ethereum")]
pub mod ethereum;
#[cfg(feature = "litecoin")]
pub mod litecoin;
#[cfg(feature = "solana")]
pub mod solana;
#[cfg(feature = "sui")]
pub mod sui;
#[cfg(feature = "tron")]
pub mod tron;

/// Blockchain network a keystore address is derived for.
///
/// The discriminants are the network ids of the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Network {
    Aptos = 0,
    Bitcoin = 1,
    Ethereum = 2,
    Litecoin = 3,
    Solana = 4,
    Sui = 5,
    Tron = 6,
}

impl Network {
    pub const ALL: [Network; 7] = [
        Network::Aptos,
        Network::Bitcoin,
        Network::Ethereum,
        Network::Litecoin,
        Network::Solana,
        Network::Sui,
        Network::Tron,
    ];

    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Resolves a C ABI network id.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::UnknownNetwork`] for ids outside `0..=6`.
    pub const fn from_id(id: u32) -> Result<Self> {
        match id {
            0 => Ok(Network::Aptos),
            1 => Ok(Network::Bitcoin),
            2 => Ok(Network::Ethereum),
            3 => Ok(Network::Litecoin),
            4 => Ok(Network::Solana),
            5 => Ok(Network::Sui),
            6 => Ok(Network::Tron),
            _ => Err(KeystoreError::UnknownNetwork(id)),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Aptos => "aptos",
            Network::Bitcoin => "bitcoin",
            Network::Ethereum => "ethereum",
            Network::Litecoin => "litecoin",
            Network::Solana => "solana",
            Network::Sui => "sui",
            Network::Tron => "tron",
        }
    }

    /// Curve the network's accounts are keyed on.
    #[must_use]
    pub const fn curve(self) -> Curve {
        match self {
            Network::Aptos | Network::Solana | Network::Sui => Curve::Ed25519,
            Network::Bitcoin | Network::Ethereum | Network::Litecoin | Network::Tron => {
                Curve::Secp256k1
            }
        }
    }

    /// Fixed address width in characters, excluding any NUL terminator.
    ///
    /// Base58 encodings (Bitcoin, Solana) may come out shorter and are
    /// NUL-padded to this width at the C boundary.
    #[must_use]
    pub const fn address_len(self) -> usize {
        match self {
            Network::Aptos | Network::Sui => 64,
            Network::Bitcoin | Network::Litecoin | Network::Tron => 34,
            Network::Ethereum => 40,
            Network::Solana => 44,
        }
    }

    /// Whether support for this network was compiled in.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        match self {
            Network::Aptos => cfg!(feature = "aptos"),
            Network::Bitcoin => cfg!(feature = "bitcoin"),
            Network::Ethereum => cfg!(feature = "ethereum"),
            Network::Litecoin => cfg!(feature = "litecoin"),
            Network::Solana => cfg!(feature = "solana"),
            Network::Sui => cfg!(feature = "sui"),
            Network::Tron => cfg!(feature = "tron"),
        }
    }

    pub(crate) fn ensure_enabled(self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(KeystoreError::NetworkNotEnabled(self))
        }
    }
}

impl TryFrom<u32> for Network {
    type Error = KeystoreError;

    fn try_from(id: u32) -> Result<Self> {
        Network::from_id(id)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A network address in its canonical text encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    encoded: String,
}

impl Address {
    /// Validates `text` against the network's address format.
    ///
    /// Checks the length and alphabet, Base58Check checksum and version byte
    /// (Bitcoin, Litecoin, Tron) and EIP-55 checksum (Ethereum). A `0x` prefix
    /// is accepted and dropped for the hex networks. Ethereum addresses without
    /// a checksum are stored in EIP-55 form.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::InvalidAddress`] when the text is malformed.
    pub fn parse(network: Network, text: &str) -> Result<Self> {
        network.ensure_enabled()?;

        let text = match network {
            Network::Aptos | Network::Ethereum | Network::Sui => {
                text.strip_prefix("0x").unwrap_or(text)
            }
            _ => text,
        };

        let canonical = match network {
            #[cfg(feature = "aptos")]
            Network::Aptos => aptos::validate(text).map(|()| text.to_string()),
            #[cfg(feature = "bitcoin")]
            Network::Bitcoin => bitcoin::validate(text).map(|()| text.to_string()),
            #[cfg(feature = "ethereum")]
            Network::Ethereum => ethereum::validate(text),
            #[cfg(feature = "litecoin")]
            Network::Litecoin => litecoin::validate(text).map(|()| text.to_string()),
            #[cfg(feature = "solana")]
            Network::Solana => solana::validate(text).map(|()| text.to_string()),
            #[cfg(feature = "sui")]
            Network::Sui => sui::validate(text).map(|()| text.to_string()),
            #[cfg(feature = "tron")]
            Network::Tron => tron::validate(text).map(|()| text.to_string()),
            #[allow(unreachable_patterns)]
            _ => return Err(KeystoreError::NetworkNotEnabled(network)),
        };

        let encoded =
            canonical.map_err(|reason| KeystoreError::InvalidAddress { network, reason })?;

        Ok(Address { network, encoded })
    }

    #[inline]
    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The address NUL-padded to [`Network::address_len`] bytes.
    #[must_use]
    pub fn to_padded_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.network.address_len()];
        bytes[..self.encoded.len()].copy_from_slice(self.encoded.as_bytes());
        bytes
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Derives the public address of `key` on `network`.
///
/// # Errors
///
/// - [`KeystoreError::UnsupportedKeyForNetwork`] if the key's curve is not the
///   one `network` uses.
/// - [`KeystoreError::NetworkNotEnabled`] if the network's feature is off.
pub fn derive_address(key: &PrivateKey, network: Network) -> Result<Address> {
    network.ensure_enabled()?;

    let encoded = match (network, key) {
        #[cfg(feature = "aptos")]
        (Network::Aptos, PrivateKey::Ed25519(key)) => aptos::encode(key),
        #[cfg(feature = "bitcoin")]
        (Network::Bitcoin, PrivateKey::Secp256k1(key)) => bitcoin::encode(key),
        #[cfg(feature = "ethereum")]
        (Network::Ethereum, PrivateKey::Secp256k1(key)) => ethereum::encode(key),
        #[cfg(feature = "litecoin")]
        (Network::Litecoin, PrivateKey::Secp256k1(key)) => litecoin::encode(key),
        #[cfg(feature = "solana")]
        (Network::Solana, PrivateKey::Ed25519(key)) => solana::encode(key),
        #[cfg(feature = "sui")]
        (Network::Sui, PrivateKey::Ed25519(key)) => sui::encode(key),
        #[cfg(feature = "tron")]
        (Network::Tron, PrivateKey::Secp256k1(key)) => tron::encode(key),
        (network, key) => {
            return Err(KeystoreError::UnsupportedKeyForNetwork {
                network,
                reason: format!(
                    "expected a {} key, got {}",
                    network.curve(),
                    key.curve()
                ),
            })
        }
    };

    debug_assert!(encoded.len() <= network.address_len());

    Ok(Address { network, encoded })
}

/// Last 20 bytes of Keccak256 over the uncompressed public key without its
/// 0x04 prefix. Shared by Ethereum and Tron.
#[cfg(any(feature = "ethereum", feature = "tron"))]
pub(crate) fn keccak_account(key: &k256::ecdsa::SigningKey) -> [u8; 20] {
    use sha3::{Digest, Keccak256};

    let encoded = key.verifying_key().to_encoded_point(false);
    let hash = Keccak256::digest(&encoded.as_bytes()[1..]);

    let mut account = [0u8; 20];
    account.copy_from_slice(&hash[12..]);
    account
}

/// Canonical form of the hash-derived Aptos and Sui addresses: `len`
/// lowercase hex characters.
#[cfg(any(feature = "aptos", feature = "sui"))]
pub(crate) fn validate_hex_account(address: &str, len: usize) -> std::result::Result<(), String> {
    if address.len() != len {
        return Err(format!("expected {len} hex characters, got {}", address.len()));
    }
    if !address
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err("expected lowercase hex characters".into());
    }
    Ok(())
}

#[cfg(all(
    test,
    feature = "aptos",
    feature = "bitcoin",
    feature = "ethereum",
    feature = "litecoin",
    feature = "solana",
    feature = "sui",
    feature = "tron"
))]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn network_ids_roundtrip() {
        for network in Network::ALL {
            assert_eq!(Network::from_id(network.id()).unwrap(), network);
        }
    }

    #[test]
    fn unknown_network_id_is_rejected() {
        for id in [7, 255, u32::MAX] {
            assert!(matches!(
                Network::try_from(id),
                Err(KeystoreError::UnknownNetwork(n)) if n == id
            ));
        }
    }

    #[test]
    fn wrong_curve_is_rejected_for_every_network() {
        let mut rng = thread_rng();
        let secp = PrivateKey::generate(Curve::Secp256k1, &mut rng).unwrap();
        let ed = PrivateKey::generate(Curve::Ed25519, &mut rng).unwrap();

        for network in Network::ALL {
            let wrong = match network.curve() {
                Curve::Secp256k1 => &ed,
                Curve::Ed25519 => &secp,
            };
            assert!(matches!(
                derive_address(wrong, network),
                Err(KeystoreError::UnsupportedKeyForNetwork { .. })
            ));
        }
    }

    #[test]
    fn derived_addresses_parse_back() {
        let mut rng = thread_rng();
        for network in Network::ALL {
            let key = PrivateKey::generate(network.curve(), &mut rng).unwrap();
            let address = derive_address(&key, network).unwrap();

            assert!(address.as_str().len() <= network.address_len());
            assert_eq!(address.to_padded_bytes().len(), network.address_len());

            let parsed = Address::parse(network, address.as_str()).unwrap();
            assert_eq!(parsed, address);
        }
    }
}
