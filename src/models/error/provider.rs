use thiserror::Error;

/// Errors from the blockchain provider collaborators.
///
/// `RpcError` carries the provider's message verbatim. Operators rely on
/// that text to tell a lingering nonce conflict apart from a contract-level
/// rejection, so nothing here wraps it in generic prose.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{0}")]
    RpcError(String),

    #[error("network configuration error: {0}")]
    NetworkConfiguration(String),
}
