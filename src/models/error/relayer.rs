use super::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayerError {
    /// The pool resolved to zero usable keys. Fatal for the request; raised
    /// at selection time, not load time, so partially configured pools fail
    /// loudly where they are used.
    #[error("no relayer keys configured for pool '{0}'")]
    NoKeysConfigured(String),

    /// The caller demanded a specific signer the pool does not hold.
    #[error(
        "relayer {address} is not provisioned in pool '{pool}'. Add its key to the pool's \
         configured sources, or regenerate the dependent on-chain artifact for a relayer \
         that is provisioned."
    )]
    RequiredRelayerNotInPool { pool: String, address: String },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid private key material: {0}")]
    InvalidKey(String),

    /// Chain-write failure, re-raised with the provider's original message.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
