use thiserror::Error;

/// Errors from the shared nonce allocator collaborator.
///
/// These never reach `submit` callers: allocation failures degrade to the
/// provider-observed nonce and broadcast notifications are fire-and-forget.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NonceAllocatorError {
    #[error("nonce allocator unavailable: {0}")]
    Unavailable(String),

    #[error("nonce allocator rejected request: {0}")]
    Rejected(String),
}
