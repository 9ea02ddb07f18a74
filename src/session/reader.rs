//! Read-path session: sequential reads with seek/skip over an exclusively-
//! owned remote file handle. Same lifecycle discipline as the write path.

use super::registry::{SessionRegistry, SessionToken};
use super::{SessionId, SessionKind, SessionState};
use crate::error::FsError;
use crate::ipc::handle::FileHandle;
use log::{error, warn};
use std::sync::Arc;

/// One open-for-read remote file.
pub struct ReadSession<H: FileHandle> {
    id: SessionId,
    handle: H,
    registry: Arc<SessionRegistry>,
    // registry holds the Weak side of this token
    _alive: Arc<SessionToken>,
    cursor: u64,
    state: SessionState,
}

impl<H: FileHandle> ReadSession<H> {
    pub(crate) fn new(handle: H, registry: Arc<SessionRegistry>, path: &str) -> Self {
        let token = Arc::new(SessionToken);
        let id = registry.register(SessionKind::Read, path, &token);
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

    /// Absolute file offset the next read starts at.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    fn ensure_open(&self, op: &str) -> Result<(), FsError> {
        if self.state == SessionState::Closed {
            error!("{op} on closed read session {:?}", self.id);
            return Err(FsError::SessionClosed);
        }
        Ok(())
    }

    /// Read up to `len` bytes at the cursor and advance it by the number of
    /// bytes actually returned. An empty result means end of file.
    pub async fn read(&mut self, len: usize) -> Result<Vec<u8>, FsError> {
        self.ensure_open("read")?;
        if len == 0 {
            return Ok(Vec::new());
        }
        let out = self.handle.read_file_data(len, self.cursor).await?;
        self.cursor += out.len() as u64;
        Ok(out)
    }

    /// Read one byte; `None` at end of file.
    pub async fn read_byte(&mut self) -> Result<Option<u8>, FsError> {
        let out = self.read(1).await?;
        Ok(out.first().copied())
    }

    /// Reposition the cursor to an absolute offset. No remote call is made;
    /// a position past the end simply yields empty reads.
    pub fn seek(&mut self, pos: u64) -> Result<(), FsError> {
        self.ensure_open("seek")?;
        self.cursor = pos;
        Ok(())
    }

    /// Advance the cursor by `n` bytes without transferring data; returns
    /// the new position.
    pub fn skip(&mut self, n: u64) -> Result<u64, FsError> {
        self.ensure_open("skip")?;
        self.cursor += n;
        Ok(self.cursor)
    }

    /// Close the session: release the remote handle and deregister from the
    /// registry. Idempotent; only the first call closes and notifies.
    pub async fn close(&mut self) -> Result<(), FsError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        if let Err(e) = self.handle.close().await {
            warn!("closing handle of read session {:?} failed: {e}", self.id);
        }
        self.registry.notify_closed(self.id);
        Ok(())
    }
}

impl<H: FileHandle> Drop for ReadSession<H> {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            warn!(
                "read session {:?} dropped without close; remote handle leaked",
                self.id
            );
        }
    }
}
