//! Relayer key identity.
//!
//! A `RelayerKey` binds a normalized private key to the pool it was loaded
//! for, its stable id within that pool, and the EIP-55 checksummed address
//! derived from the key. Keys are immutable once loaded and live in the
//! pool cache for the lifetime of the process; the secret material itself
//! is held in a [`SecretString`] and never appears in logs.

use alloy::primitives::FixedBytes;
use alloy::signers::local::PrivateKeySigner;

use crate::models::{RelayerError, SecretString};

#[derive(Debug, Clone, PartialEq)]
pub struct RelayerKey {
    /// Stable identifier, `pool:index`. The index counts accepted keys in
    /// discovery order.
    pub id: String,
    /// Name of the pool this key was loaded for.
    pub pool: String,
    /// EIP-55 checksummed address derived from the private key.
    pub address: String,
    private_key: SecretString,
}

impl RelayerKey {
    /// Derives the key's address and builds its identity. `normalized_key`
    /// must already be in `0x` + 64 lowercase hex form (see
    /// `KeyPoolLoader`).
    pub fn new(pool: &str, index: usize, normalized_key: &str) -> Result<Self, RelayerError> {
        let address = derive_checksum_address(normalized_key)?;
        Ok(Self {
            id: format!("{}:{}", pool, index),
            pool: pool.to_string(),
            address,
            private_key: SecretString::new(normalized_key),
        })
    }

    /// Borrows the `0x`-prefixed private key hex for the duration of the
    /// closure, e.g. to construct a wallet for signing.
    pub fn with_private_key<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        self.private_key.as_str(f)
    }

    /// Builds an alloy local signer from the key material.
    pub fn signer(&self) -> Result<PrivateKeySigner, RelayerError> {
        self.private_key.as_str(signer_from_hex)
    }
}

fn signer_from_hex(key_hex: &str) -> Result<PrivateKeySigner, RelayerError> {
    let raw = hex::decode(key_hex.trim_start_matches("0x"))
        .map_err(|e| RelayerError::InvalidKey(format!("non-hex key material: {}", e)))?;
    if raw.len() != 32 {
        return Err(RelayerError::InvalidKey(format!(
            "expected 32 key bytes, got {}",
            raw.len()
        )));
    }
    let key_bytes = FixedBytes::<32>::from_slice(&raw);
    PrivateKeySigner::from_bytes(&key_bytes)
        .map_err(|e| RelayerError::InvalidKey(format!("failed to create signer: {}", e)))
}

/// Derives the EIP-55 checksummed address for a `0x`-prefixed private key.
pub fn derive_checksum_address(key_hex: &str) -> Result<String, RelayerError> {
    let signer = signer_from_hex(key_hex)?;
    Ok(signer.address().to_checksum(None))
}
