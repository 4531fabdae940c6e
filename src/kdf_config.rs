//! Scrypt configuration presets and custom parameters.
//!
//! The salt is not part of the configuration: a fresh one is drawn for every
//! keystore and recorded next to these parameters.
//!
//! # Examples
//!
//! ```
//! use ksgen::KdfConfig;
//!
//! // Parameters written by the C ABI (N=2^13, r=8, p=8)
//! let config = KdfConfig::default();
//!
//! // Faster parameters for interactive applications
//! let config = KdfConfig::scrypt_interactive();
//!
//! // Stronger parameters for cold storage
//! let config = KdfConfig::scrypt_sensitive();
//!
//! // Custom parameters
//! let config = KdfConfig::custom_scrypt(15, 8, 1);
//! ```

use crate::crypto_config::*;
use crate::error::{KeystoreError, Result};

/// Configuration for the scrypt key derivation function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfConfig {
    pub(crate) n: u32,
    pub(crate) r: u32,
    pub(crate) p: u32,
    pub(crate) dklen: u32,
}

impl KdfConfig {
    /// CPU/memory cost parameter N.
    #[inline]
    #[must_use]
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Block size parameter r.
    #[inline]
    #[must_use]
    pub fn r(&self) -> u32 {
        self.r
    }

    /// Parallelization parameter p.
    #[inline]
    #[must_use]
    pub fn p(&self) -> u32 {
        self.p
    }

    /// Derived key length in bytes.
    #[inline]
    #[must_use]
    pub fn dklen(&self) -> u32 {
        self.dklen
    }

    /// Interactive Scrypt parameters (N=2^14, r=8, p=1, dklen=32).
    ///
    /// - Memory requirement: ~16 MB
    /// - Time on modern CPU: ~100 ms
    #[inline]
    #[must_use]
    pub fn scrypt_interactive() -> Self {
        Self::custom_scrypt(14, 8, 1)
    }

    /// Sensitive Scrypt parameters (N=2^20, r=8, p=1, dklen=32).
    ///
    /// Maximum security parameters for cold storage or high-value keys.
    ///
    /// - Memory requirement: ~1 GB
    /// - Time on modern CPU: ~5-10 seconds
    #[inline]
    #[must_use]
    pub fn scrypt_sensitive() -> Self {
        Self::custom_scrypt(20, 8, 1)
    }

    /// Create custom Scrypt parameters from log₂(N).
    ///
    /// A `log_n` of 32 or more cannot be represented and yields N = 0, which
    /// [`KdfConfig::validate`] rejects.
    ///
    /// ```
    /// use ksgen::KdfConfig;
    ///
    /// // Fast testing parameters (N=16)
    /// let config = KdfConfig::custom_scrypt(4, 8, 1);
    /// assert_eq!(config.n(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn custom_scrypt(log_n: u8, r: u32, p: u32) -> Self {
        let n = 1u32.checked_shl(u32::from(log_n)).unwrap_or(0);
        Self::with_cost(n, r, p)
    }

    /// Create custom Scrypt parameters from a raw cost factor N.
    ///
    /// Nothing is checked here; invalid values are reported when the
    /// configuration is used.
    #[inline]
    #[must_use]
    pub fn with_cost(n: u32, r: u32, p: u32) -> Self {
        KdfConfig {
            n,
            r,
            p,
            dklen: DERIVED_KEY_SIZE as u32,
        }
    }

    /// Checks the parameters without running the KDF.
    ///
    /// # Errors
    ///
    /// - [`KeystoreError::InvalidKdfParams`] if N is not a power of two, N is
    ///   below the accepted minimum, or r or p is zero.
    /// - [`KeystoreError::AllocationFailure`] if scrypt would need more working
    ///   memory than the crate allows.
    pub fn validate(&self) -> Result<()> {
        validate_cost(self.n, self.r, self.p)
    }
}

impl Default for KdfConfig {
    /// N=2^13, r=8, p=8, dklen=32: the parameters every C ABI keystore uses.
    #[inline]
    fn default() -> Self {
        Self::custom_scrypt(
            DEFAULT_KDF_PARAMS_LOG_N,
            DEFAULT_KDF_PARAMS_R,
            DEFAULT_KDF_PARAMS_P,
        )
    }
}

pub(crate) fn validate_cost(n: u32, r: u32, p: u32) -> Result<()> {
    if !n.is_power_of_two() {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Scrypt n parameter must be a power of 2, got {n}"
        )));
    }
    if n < MIN_SCRYPT_N {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Scrypt n parameter must be at least {MIN_SCRYPT_N}, got {n}"
        )));
    }
    if r == 0 {
        return Err(KeystoreError::InvalidKdfParams(
            "Scrypt r parameter must be at least 1".into(),
        ));
    }
    if p == 0 {
        return Err(KeystoreError::InvalidKdfParams(
            "Scrypt p parameter must be at least 1".into(),
        ));
    }
    match scrypt_working_set(n, r, p) {
        Some(bytes) if bytes <= MAX_SCRYPT_MEMORY => Ok(()),
        _ => Err(KeystoreError::AllocationFailure(format!(
            "Scrypt with n={n}, r={r}, p={p} exceeds the {MAX_SCRYPT_MEMORY} byte memory limit"
        ))),
    }
}

/// Bytes scrypt allocates: `128·r·N` for the lookup table, `128·r·p` for the
/// blocks and `128·r` of mixing scratch. `None` on overflow.
fn scrypt_working_set(n: u32, r: u32, p: u32) -> Option<u64> {
    let blocks = u64::from(n)
        .checked_add(u64::from(p))?
        .checked_add(1)?;
    128u64.checked_mul(u64::from(r))?.checked_mul(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_fast_parameters_under_test() {
        let config = KdfConfig::default();
        assert_eq!(config.n(), 16);
        assert_eq!(config.r(), 8);
        assert_eq!(config.p(), 8);
        assert_eq!(config.dklen(), 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scrypt_interactive_is_weaker_than_sensitive() {
        let interactive = KdfConfig::scrypt_interactive();
        let sensitive = KdfConfig::scrypt_sensitive();
        assert_eq!(interactive.n(), 1 << 14);
        assert_eq!(sensitive.n(), 1 << 20);
        assert!(interactive.n() < sensitive.n());
    }

    #[test]
    fn custom_scrypt_uses_provided_parameters() {
        let config = KdfConfig::custom_scrypt(10, 4, 2);
        assert_eq!(config.n(), 1024);
        assert_eq!(config.r(), 4);
        assert_eq!(config.p(), 2);
        assert_eq!(config.dklen(), 32);
    }

    #[test]
    fn oversized_log_n_becomes_invalid_zero_cost() {
        let config = KdfConfig::custom_scrypt(40, 8, 1);
        assert_eq!(config.n(), 0);
        assert!(matches!(
            config.validate(),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_and_non_power_of_two_cost() {
        for n in [0, 3, 100, 1000] {
            let result = KdfConfig::with_cost(n, 8, 1).validate();
            assert!(
                matches!(result, Err(KeystoreError::InvalidKdfParams(_))),
                "n={n} should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_weak_cost() {
        let result = KdfConfig::with_cost(8, 8, 1).validate();
        assert!(matches!(result, Err(KeystoreError::InvalidKdfParams(_))));
    }

    #[test]
    fn validate_counts_parallel_blocks_toward_memory_limit() {
        let result = KdfConfig::with_cost(16, 1, (1 << 29) - 1).validate();
        assert!(matches!(result, Err(KeystoreError::AllocationFailure(_))));

        let result = KdfConfig::with_cost(16, 1 << 20, 1 << 9).validate();
        assert!(matches!(result, Err(KeystoreError::AllocationFailure(_))));

        assert!(KdfConfig::scrypt_sensitive().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_r_and_p() {
        assert!(KdfConfig::with_cost(16, 0, 1).validate().is_err());
        assert!(KdfConfig::with_cost(16, 8, 0).validate().is_err());
    }
}
