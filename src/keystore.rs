use crate::chains::{derive_address, Address, Network};
use crate::cipher;
use crate::crypto_config::*;
use crate::error::{KeystoreError, Result};
use crate::kdf::KdfParams;
use crate::kdf_config::{validate_cost, KdfConfig};
use crate::keys::PrivateKey;
use crate::mac::compute_mac;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Keystore format version (Web3 Secret Storage v3 layout).
pub const VERSION_3: u32 = 3;

/// The encrypted half of a keystore: everything needed to recover the private
/// key from the password, and nothing about the account it belongs to.
///
/// The network never influences these fields. Cipher and KDF are always
/// `aes-128-ctr` and `scrypt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreRecord {
    iv: [u8; IV_SIZE],
    ciphertext: [u8; PRIVATE_KEY_SIZE],
    kdfparams: KdfParams,
    mac: [u8; MAC_SIZE],
}

impl KeystoreRecord {
    /// Encrypts `secret` under a key derived from `password`.
    fn seal(
        secret: &[u8; PRIVATE_KEY_SIZE],
        password: &[u8],
        kdfparams: KdfParams,
        iv: [u8; IV_SIZE],
    ) -> Result<Self> {
        let derived_key = kdfparams.derive(password)?;
        let (encryption_key, mac_key) = derived_key.split_at(ENCRYPTION_KEY_SIZE);

        let encrypted = cipher::encrypt(encryption_key, &iv, secret)?;
        let mut ciphertext = [0u8; PRIVATE_KEY_SIZE];
        ciphertext.copy_from_slice(&encrypted);
        let mac = compute_mac(&mac_key[..MAC_KEY_SIZE], &ciphertext);

        Ok(KeystoreRecord {
            iv,
            ciphertext,
            kdfparams,
            mac,
        })
    }

    #[inline]
    #[must_use]
    pub fn cipher(&self) -> &'static str {
        CIPHER_NAME
    }

    #[inline]
    #[must_use]
    pub fn kdf(&self) -> &'static str {
        KDF_NAME
    }

    #[inline]
    #[must_use]
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    #[inline]
    #[must_use]
    pub fn ciphertext(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.ciphertext
    }

    #[inline]
    #[must_use]
    pub fn kdfparams(&self) -> &KdfParams {
        &self.kdfparams
    }

    #[inline]
    #[must_use]
    pub fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// Recovers the 32 private key bytes.
    ///
    /// # Errors
    ///
    /// - [`KeystoreError::IntegrityFailure`] for a wrong password or a
    ///   tampered record.
    /// - [`KeystoreError::InvalidKdfParams`] / [`KeystoreError::AllocationFailure`]
    ///   if the stored scrypt parameters are unusable.
    pub fn decrypt<P: AsRef<[u8]>>(&self, password: P) -> Result<Zeroizing<Vec<u8>>> {
        let derived_key = self.kdfparams.derive(password.as_ref())?;
        let (encryption_key, mac_key) = derived_key.split_at(ENCRYPTION_KEY_SIZE);

        cipher::decrypt(
            encryption_key,
            &self.iv,
            &self.ciphertext,
            &mac_key[..MAC_KEY_SIZE],
            &self.mac,
        )
    }
}

/// A generated keystore: the encrypted record plus the account it unlocks.
///
/// The private key itself is not kept; [`Keystore::decrypt_key`] recovers it.
///
/// # Examples
///
/// ```
/// use ksgen::{KdfConfig, Keystore, Network};
///
/// // Use fast KDF for doctests
/// let keystore = Keystore::new_with_config(
///     Network::Ethereum,
///     "my_password",
///     KdfConfig::custom_scrypt(4, 8, 1),
/// ).unwrap();
///
/// println!("Address: {}", keystore.address());
/// let key = keystore.decrypt_key("my_password").unwrap();
/// assert_eq!(key.curve(), Network::Ethereum.curve());
/// ```
#[derive(Debug, Clone)]
pub struct Keystore {
    record: KeystoreRecord,
    address: Address,
    id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeystoreJson<K> {
    address: String,
    crypto: CryptoJson<K>,
    id: Uuid,
    version: u32,
    chain: Network,
}

/// `K` is [`ScryptParamsJson`] when writing. When reading it stays a raw
/// JSON value until `kdf` has been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CryptoJson<K> {
    cipher: String,
    cipherparams: CipherparamsJson,
    ciphertext: String,
    kdf: String,
    kdfparams: K,
    mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CipherparamsJson {
    iv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScryptParamsJson {
    dklen: u32,
    n: u32,
    p: u32,
    r: u32,
    salt: String,
}

fn decode_hex<const N: usize>(field: &str, text: &str) -> Result<[u8; N]> {
    let bytes =
        hex::decode(text).map_err(|e| KeystoreError::HexError(format!("Invalid {field}: {e}")))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        KeystoreError::HexError(format!("Invalid {field}: expected {N} bytes, got {len}"))
    })
}

impl From<&KeystoreRecord> for CryptoJson<ScryptParamsJson> {
    fn from(record: &KeystoreRecord) -> Self {
        let params = &record.kdfparams;
        let kdfparams = ScryptParamsJson {
            dklen: params.dklen,
            n: params.n,
            p: params.p,
            r: params.r,
            salt: hex::encode(params.salt),
        };

        CryptoJson {
            cipher: CIPHER_NAME.to_string(),
            cipherparams: CipherparamsJson {
                iv: hex::encode(record.iv),
            },
            ciphertext: hex::encode(record.ciphertext),
            kdf: KDF_NAME.to_string(),
            kdfparams,
            mac: hex::encode(record.mac),
        }
    }
}

impl TryFrom<CryptoJson<serde_json::Value>> for KeystoreRecord {
    type Error = KeystoreError;

    fn try_from(crypto: CryptoJson<serde_json::Value>) -> Result<Self> {
        if crypto.cipher != CIPHER_NAME {
            return Err(KeystoreError::UnsupportedCipher(crypto.cipher));
        }
        if crypto.kdf != KDF_NAME {
            return Err(KeystoreError::UnsupportedKdf(crypto.kdf));
        }

        let params: ScryptParamsJson = serde_json::from_value(crypto.kdfparams)?;
        validate_cost(params.n, params.r, params.p)?;

        Ok(KeystoreRecord {
            iv: decode_hex("IV", &crypto.cipherparams.iv)?,
            ciphertext: decode_hex("ciphertext", &crypto.ciphertext)?,
            kdfparams: KdfParams {
                dklen: params.dklen,
                n: params.n,
                r: params.r,
                p: params.p,
                salt: decode_hex("KDF salt", &params.salt)?,
            },
            mac: decode_hex("MAC", &crypto.mac)?,
        })
    }
}

impl Keystore {
    /// Generates a keystore for `network` with the default scrypt parameters
    /// and the operating system's RNG.
    pub fn new<P: AsRef<[u8]>>(network: Network, password: P) -> Result<Self> {
        Self::new_with_config(network, password, KdfConfig::default())
    }

    /// Generates a keystore for `network` with custom scrypt parameters.
    ///
    /// ```
    /// use ksgen::{KdfConfig, Keystore, Network};
    ///
    /// let keystore = Keystore::new_with_config(
    ///     Network::Solana,
    ///     "password",
    ///     KdfConfig::custom_scrypt(4, 8, 1),
    /// ).unwrap();
    /// assert_eq!(keystore.record().kdfparams().n(), 16);
    /// ```
    pub fn new_with_config<P: AsRef<[u8]>>(
        network: Network,
        password: P,
        config: KdfConfig,
    ) -> Result<Self> {
        Self::generate_with_rng_and_config(&mut OsRng, network, password, config)
    }

    /// Generates the private key from `rng` as well as the salt and IV.
    ///
    /// The network and configuration are checked before anything is drawn
    /// from `rng`.
    ///
    /// # Errors
    ///
    /// - [`KeystoreError::InvalidKdfParams`] for an empty password or invalid
    ///   scrypt parameters.
    /// - [`KeystoreError::NetworkNotEnabled`] if the network was compiled out.
    /// - [`KeystoreError::RandomnessFailure`] if `rng` fails.
    pub fn generate_with_rng_and_config<R: RngCore + CryptoRng, P: AsRef<[u8]>>(
        rng: &mut R,
        network: Network,
        password: P,
        config: KdfConfig,
    ) -> Result<Self> {
        check_inputs(network, password.as_ref(), &config)?;

        let key = PrivateKey::generate(network.curve(), rng)?;
        Self::from_key_with_rng_and_config(rng, network, &key, password, config)
    }

    /// Wraps an existing private key.
    pub fn from_key_with_config<P: AsRef<[u8]>>(
        network: Network,
        key: &PrivateKey,
        password: P,
        config: KdfConfig,
    ) -> Result<Self> {
        Self::from_key_with_rng_and_config(&mut OsRng, network, key, password, config)
    }

    /// Wraps an existing private key, drawing the salt and IV from `rng`.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::UnsupportedKeyForNetwork`] if the key is on the
    /// wrong curve, plus everything
    /// [`Keystore::generate_with_rng_and_config`] reports.
    pub fn from_key_with_rng_and_config<R: RngCore + CryptoRng, P: AsRef<[u8]>>(
        rng: &mut R,
        network: Network,
        key: &PrivateKey,
        password: P,
        config: KdfConfig,
    ) -> Result<Self> {
        let password = password.as_ref();
        check_inputs(network, password, &config)?;
        let address = derive_address(key, network)?;

        let mut salt = [0u8; SALT_SIZE];
        let mut iv = [0u8; IV_SIZE];
        rng.try_fill_bytes(&mut salt)
            .and_then(|()| rng.try_fill_bytes(&mut iv))
            .map_err(|e| KeystoreError::RandomnessFailure(e.to_string()))?;

        debug!(%network, n = config.n, r = config.r, p = config.p, "sealing keystore");
        let record = KeystoreRecord::seal(
            &key.to_bytes(),
            password,
            KdfParams::new(config, salt),
            iv,
        )?;

        info!(%network, %address, "keystore generated");

        Ok(Keystore {
            record,
            address,
            id: Uuid::new_v4(),
        })
    }

    /// Decrypts the private key and checks that it still derives the stored
    /// address.
    ///
    /// # Errors
    ///
    /// - [`KeystoreError::IntegrityFailure`] for a wrong password or a
    ///   tampered record.
    /// - [`KeystoreError::AddressMismatch`] if the record decrypts but
    ///   belongs to another account.
    pub fn decrypt_key<P: AsRef<[u8]>>(&self, password: P) -> Result<PrivateKey> {
        let network = self.network();
        let secret = self.record.decrypt(password)?;
        let key = PrivateKey::from_bytes(network.curve(), &secret)?;

        if derive_address(&key, network)? != self.address {
            return Err(KeystoreError::AddressMismatch);
        }
        Ok(key)
    }

    #[inline]
    #[must_use]
    pub fn record(&self) -> &KeystoreRecord {
        &self.record
    }

    #[inline]
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[inline]
    #[must_use]
    pub fn network(&self) -> Network {
        self.address.network()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        VERSION_3
    }

    /// Serializes the keystore to a Web3 Secret Storage v3 JSON document with
    /// an added `chain` field naming the network.
    pub fn to_json(&self) -> Result<String> {
        let document = KeystoreJson {
            address: self.address.to_string(),
            crypto: CryptoJson::from(&self.record),
            id: self.id,
            version: VERSION_3,
            chain: self.network(),
        };
        serde_json::to_string_pretty(&document).map_err(Into::into)
    }

    /// Parses a document written by [`Keystore::to_json`].
    ///
    /// Nothing is decrypted; call [`Keystore::decrypt_key`] with the
    /// password afterwards.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::UnsupportedVersion`], [`KeystoreError::UnsupportedCipher`],
    /// [`KeystoreError::UnsupportedKdf`], [`KeystoreError::HexError`],
    /// [`KeystoreError::InvalidAddress`] or [`KeystoreError::SerializationError`]
    /// for documents this crate cannot read.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: KeystoreJson<serde_json::Value> = serde_json::from_str(json)?;

        if document.version != VERSION_3 {
            return Err(KeystoreError::UnsupportedVersion(document.version));
        }

        let record = KeystoreRecord::try_from(document.crypto)?;
        let address = Address::parse(document.chain, &document.address)?;

        Ok(Keystore {
            record,
            address,
            id: document.id,
        })
    }
}

fn check_inputs(network: Network, password: &[u8], config: &KdfConfig) -> Result<()> {
    network.ensure_enabled()?;
    if password.is_empty() {
        return Err(KeystoreError::InvalidKdfParams(
            "Password must not be empty".into(),
        ));
    }
    config.validate()?;
    if config.dklen as usize != DERIVED_KEY_SIZE {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Keystore dklen must be {DERIVED_KEY_SIZE}, got {}",
            config.dklen
        )));
    }
    Ok(())
}

/// Generates a keystore for `network` from `password` with the default
/// parameters. Equivalent to [`Keystore::new`].
pub fn init_keystore<P: AsRef<[u8]>>(network: Network, password: P) -> Result<Keystore> {
    Keystore::new(network, password)
}

/// Builder for keystores with a custom key, KDF configuration or id.
///
/// ```
/// use ksgen::{KdfConfig, KeystoreBuilder, Network};
///
/// let keystore = KeystoreBuilder::new(Network::Tron)
///     .with_kdf_config(KdfConfig::custom_scrypt(4, 8, 1))
///     .build("password")
///     .unwrap();
/// assert!(keystore.address().as_str().starts_with('T'));
/// ```
#[derive(Debug)]
pub struct KeystoreBuilder {
    network: Network,
    key: Option<PrivateKey>,
    kdf_config: KdfConfig,
    id: Option<Uuid>,
}

impl KeystoreBuilder {
    /// A builder that generates a random key with the default scrypt
    /// parameters.
    #[inline]
    #[must_use]
    pub fn new(network: Network) -> Self {
        KeystoreBuilder {
            network,
            key: None,
            kdf_config: KdfConfig::default(),
            id: None,
        }
    }

    /// Encrypts `key` instead of generating one.
    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: PrivateKey) -> Self {
        self.key = Some(key);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_kdf_config(mut self, config: KdfConfig) -> Self {
        self.kdf_config = config;
        self
    }

    /// Sets the keystore id instead of a random UUID v4.
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn build<P: AsRef<[u8]>>(self, password: P) -> Result<Keystore> {
        self.build_with_rng(&mut OsRng, password)
    }

    /// Builds the keystore drawing every random value from `rng`.
    pub fn build_with_rng<R: RngCore + CryptoRng, P: AsRef<[u8]>>(
        self,
        rng: &mut R,
        password: P,
    ) -> Result<Keystore> {
        let mut keystore = match &self.key {
            Some(key) => Keystore::from_key_with_rng_and_config(
                rng,
                self.network,
                key,
                password,
                self.kdf_config,
            )?,
            None => {
                Keystore::generate_with_rng_and_config(rng, self.network, password, self.kdf_config)?
            }
        };

        if let Some(id) = self.id {
            keystore.id = id;
        }
        Ok(keystore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PASSWORD: &str = "test_password";

    fn fast() -> KdfConfig {
        KdfConfig::custom_scrypt(4, 8, 1)
    }

    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }
        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    impl CryptoRng for CountingRng {}

    fn counting() -> CountingRng {
        CountingRng {
            inner: StdRng::seed_from_u64(1),
            draws: 0,
        }
    }

    #[test]
    fn test_keystore_new() {
        let keystore = Keystore::new_with_config(Network::Ethereum, PASSWORD, fast()).unwrap();
        assert_eq!(keystore.version(), VERSION_3);
        assert_eq!(keystore.network(), Network::Ethereum);
        assert_eq!(keystore.record().cipher(), "aes-128-ctr");
        assert_eq!(keystore.record().kdf(), "scrypt");
        assert_eq!(keystore.record().kdfparams().dklen(), 32);
    }

    #[test]
    fn test_keystore_encrypt_decrypt() {
        let key = PrivateKey::from_bytes(crate::keys::Curve::Ed25519, &[9u8; 32]).unwrap();
        let keystore = Keystore::from_key_with_config(Network::Sui, &key, PASSWORD, fast()).unwrap();

        let recovered = keystore.decrypt_key(PASSWORD).unwrap();
        assert_eq!(*recovered.to_bytes(), [9u8; 32]);
    }

    #[test]
    fn test_keystore_wrong_password() {
        let keystore = Keystore::new_with_config(Network::Bitcoin, PASSWORD, fast()).unwrap();
        assert!(matches!(
            keystore.decrypt_key("wrong_password"),
            Err(KeystoreError::IntegrityFailure)
        ));
    }

    #[test]
    fn invalid_config_draws_no_randomness() {
        let mut rng = counting();
        let result = Keystore::generate_with_rng_and_config(
            &mut rng,
            Network::Ethereum,
            PASSWORD,
            KdfConfig::with_cost(0, 8, 8),
        );
        assert!(matches!(result, Err(KeystoreError::InvalidKdfParams(_))));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn empty_password_draws_no_randomness() {
        let mut rng = counting();
        let result = Keystore::generate_with_rng_and_config(&mut rng, Network::Aptos, "", fast());
        assert!(matches!(result, Err(KeystoreError::InvalidKdfParams(_))));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn wrong_curve_key_is_rejected_before_sealing() {
        let key = PrivateKey::from_bytes(crate::keys::Curve::Ed25519, &[1u8; 32]).unwrap();
        let mut rng = counting();
        let result =
            Keystore::from_key_with_rng_and_config(&mut rng, Network::Tron, &key, PASSWORD, fast());
        assert!(matches!(
            result,
            Err(KeystoreError::UnsupportedKeyForNetwork { .. })
        ));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn seeded_rng_reproduces_record() {
        let a = KeystoreBuilder::new(Network::Litecoin)
            .with_kdf_config(fast())
            .build_with_rng(&mut StdRng::seed_from_u64(7), PASSWORD)
            .unwrap();
        let b = KeystoreBuilder::new(Network::Litecoin)
            .with_kdf_config(fast())
            .build_with_rng(&mut StdRng::seed_from_u64(7), PASSWORD)
            .unwrap();

        assert_eq!(a.record(), b.record());
        assert_eq!(a.address(), b.address());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn builder_uses_custom_id() {
        let id = Uuid::from_u128(0x1234);
        let keystore = KeystoreBuilder::new(Network::Solana)
            .with_kdf_config(fast())
            .with_id(id)
            .build(PASSWORD)
            .unwrap();
        assert_eq!(keystore.id(), &id);
    }

    #[test]
    fn json_roundtrip_preserves_record() {
        let keystore = Keystore::new_with_config(Network::Aptos, PASSWORD, fast()).unwrap();
        let json = keystore.to_json().unwrap();

        let loaded = Keystore::from_json(&json).unwrap();
        assert_eq!(loaded.record(), keystore.record());
        assert_eq!(loaded.address(), keystore.address());
        assert_eq!(loaded.id(), keystore.id());
        assert!(loaded.decrypt_key(PASSWORD).is_ok());
    }

    #[test]
    fn json_layout_matches_web3_v3() {
        let keystore = Keystore::new_with_config(Network::Ethereum, PASSWORD, fast()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&keystore.to_json().unwrap()).unwrap();

        assert_eq!(value["version"], 3);
        assert_eq!(value["chain"], "ethereum");
        assert_eq!(value["crypto"]["cipher"], "aes-128-ctr");
        assert_eq!(value["crypto"]["kdf"], "scrypt");
        assert_eq!(value["crypto"]["kdfparams"]["dklen"], 32);
        assert_eq!(value["crypto"]["kdfparams"]["n"], 16);
        assert_eq!(value["crypto"]["cipherparams"]["iv"].as_str().unwrap().len(), 32);
        assert_eq!(value["crypto"]["ciphertext"].as_str().unwrap().len(), 64);
        assert_eq!(value["crypto"]["mac"].as_str().unwrap().len(), 64);
    }
}
