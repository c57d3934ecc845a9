//! EVM address helpers.
//!
//! Addresses are carried as EIP-55 checksummed strings so that equality
//! checks between configured, derived and caller-supplied addresses are
//! exact.

use std::str::FromStr;

use alloy::primitives::Address;

use crate::models::RelayerError;

/// Parses any-cased hex address input and returns its EIP-55 checksummed
/// form.
pub fn to_checksum_address(raw: &str) -> Result<String, RelayerError> {
    let parsed = Address::from_str(raw.trim())
        .map_err(|e| RelayerError::InvalidAddress(format!("{}: {}", raw, e)))?;
    Ok(parsed.to_checksum(None))
}
