//! Write-path session: a monotonic write cursor over an exclusively-owned
//! remote file handle.

use super::registry::{SessionRegistry, SessionToken};
use super::{SessionId, SessionKind, SessionState};
use crate::error::FsError;
use crate::ipc::handle::FileHandle;
use log::{error, warn};
use std::sync::Arc;

/// One open-for-write remote file.
///
/// The cursor starts at 0 and advances by exactly the number of bytes each
/// successful write submitted. Every request carries the absolute file
/// offset taken from the cursor at call time, so ordering is enforced by the
/// offset value rather than by transport sequencing. Cursor-mutating calls
/// take `&mut self`; callers sharing one session must serialize externally.
pub struct WriteSession<H: FileHandle> {
    id: SessionId,
    handle: H,
    registry: Arc<SessionRegistry>,
    // registry holds the Weak side of this token
    _alive: Arc<SessionToken>,
    cursor: u64,
    state: SessionState,
}

impl<H: FileHandle> WriteSession<H> {
    pub(crate) fn new(handle: H, registry: Arc<SessionRegistry>, path: &str) -> Self {
        let token = Arc::new(SessionToken);
        let id = registry.register(SessionKind::Write, path, &token);
        Self {
            id,
            handle,
            registry,
            _alive: token,
            cursor: 0,
            state: SessionState::Open,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Absolute file offset the next write will be issued at.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    fn ensure_open(&self, op: &str) -> Result<(), FsError> {
        if self.state == SessionState::Closed {
            error!("{op} on closed write session {:?}", self.id);
            return Err(FsError::SessionClosed);
        }
        Ok(())
    }

    /// Canonical write: submit `buf[offset..offset + len]` at the cursor and
    /// advance the cursor by `len`. The request is attempted at most once;
    /// on failure the cursor is left untouched and no retry is performed.
    pub async fn write_range(
        &mut self,
        buf: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<(), FsError> {
        self.ensure_open("write")?;
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= buf.len())
            .ok_or(FsError::InvalidRange {
                offset,
                len,
                size: buf.len(),
            })?;
        self.handle
            .write_file_data(&buf[offset..end], self.cursor)
            .await?;
        self.cursor += len as u64;
        Ok(())
    }

    /// Write a whole buffer at the cursor.
    pub async fn write(&mut self, buf: &[u8]) -> Result<(), FsError> {
        self.write_range(buf, 0, buf.len()).await
    }

    /// Write a single byte at the cursor.
    pub async fn write_byte(&mut self, byte: u8) -> Result<(), FsError> {
        self.write_range(&[byte], 0, 1).await
    }

    /// Ask the daemon to commit buffered bytes; the cursor is unchanged.
    pub async fn flush(&mut self) -> Result<(), FsError> {
        self.ensure_open("flush")?;
        self.handle.flush().await
    }

    /// Close the session: release the remote handle and deregister from the
    /// registry. Idempotent; only the first call closes and notifies.
    pub async fn close(&mut self) -> Result<(), FsError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        if let Err(e) = self.handle.close().await {
            warn!("closing handle of write session {:?} failed: {e}", self.id);
        }
        self.registry.notify_closed(self.id);
        Ok(())
    }
}

impl<H: FileHandle> Drop for WriteSession<H> {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            warn!(
                "write session {:?} dropped without close; remote handle leaked",
                self.id
            );
        }
    }
}
