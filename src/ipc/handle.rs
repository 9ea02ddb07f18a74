//! Capability traits for open remote files and the daemon connection.

use crate::error::FsError;
use async_trait::async_trait;

/// An already-open remote file.
///
/// A handle is owned by exactly one session for its whole lifetime and is
/// invalidated by `close`. Every write carries an explicit absolute file
/// offset, so out-of-order completion at the transport cannot corrupt file
/// contents as long as the offset field is honored.
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// Write `data` at the absolute `file_offset`. The request is either
    /// acknowledged as a whole or fails; partial application is not reported
    /// at this boundary.
    async fn write_file_data(&self, data: &[u8], file_offset: u64) -> Result<(), FsError>;

    /// Read up to `len` bytes starting at `file_offset`. A short or empty
    /// result means end of file.
    async fn read_file_data(&self, len: usize, file_offset: u64) -> Result<Vec<u8>, FsError>;

    /// Ask the daemon to commit any buffered bytes for this file.
    async fn flush(&self) -> Result<(), FsError>;

    /// Release the remote-side resource. Best-effort: sessions log a close
    /// failure instead of surfacing it.
    async fn close(&self) -> Result<(), FsError>;
}

/// Per-mount connection to the gateway daemon: opens remote files and hands
/// out exclusively-owned handles.
#[async_trait]
pub trait Gateway: Send + Sync {
    type Handle: FileHandle;

    /// Open an existing file for reading.
    async fn open_read(&self, path: &str) -> Result<Self::Handle, FsError>;

    /// Create (or truncate) a file and open it for writing.
    async fn open_write(&self, path: &str) -> Result<Self::Handle, FsError>;
}
