//! Error taxonomy of the session layer.
//!
//! All errors are returned synchronously from the failing call; there is no
//! deferred error channel and no internal retry. Close is the one operation
//! that tolerates terminal states without raising.

use thiserror::Error;

/// Errors surfaced by session and gateway operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// A write/flush/read was attempted on a session that is already closed.
    #[error("session is already closed")]
    SessionClosed,

    /// The requested sub-range does not fit the supplied buffer. Rejected
    /// before any request reaches the gateway.
    #[error("invalid buffer range: offset {offset} + len {len} exceeds buffer of {size} bytes")]
    InvalidRange {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Failure reported by the gateway while serving a request. Transport
    /// timeouts and connection errors surface here as well.
    #[error("gateway i/o error: {0}")]
    Io(#[from] std::io::Error),
}
