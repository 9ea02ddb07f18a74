//! File I/O sessions
//!
//! Responsibilities:
//! - Translate application byte-buffer calls into absolute-offset requests
//!   against an exclusively-owned `FileHandle`.
//! - Enforce the Open -> Closed state machine at every entry point.
//! - Deregister from the owning client's registry exactly once on close.
//!
//! Submodules:
//! - `registry`: open-stream bookkeeping shared by all sessions of a mount
//! - `writer`: write-path session (monotonic write cursor)
//! - `reader`: read-path session (sequential reads, seek/skip)

pub mod reader;
pub mod registry;
pub mod writer;

/// Opaque identity of one session within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub(crate) u64);

/// Session lifecycle. The only transition is `Open -> Closed`, taken by
/// `close()`, and it is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Direction of traffic a registered session carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Read,
    Write,
}
