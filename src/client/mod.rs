//! Filesystem client: per-mount entry point that opens sessions and tracks
//! them.
//!
//! Responsibilities:
//! - Open remote files through the injected `Gateway` and wrap the returned
//!   handles in read/write sessions.
//! - Own the shared `SessionRegistry` used for open-stream accounting;
//!   sessions notify it on close, the client never force-closes a session.

use crate::error::FsError;
use crate::ipc::handle::Gateway;
use crate::session::reader::ReadSession;
use crate::session::registry::SessionRegistry;
use crate::session::writer::WriteSession;
use log::debug;
use std::sync::Arc;

pub struct FsClient<G: Gateway> {
    gateway: G,
    registry: Arc<SessionRegistry>,
}

impl<G: Gateway> FsClient<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            registry: Arc::new(SessionRegistry::new()),
        }
    }

    /// Create (or truncate) `path` and open a write session on it.
    pub async fn create(&self, path: &str) -> Result<WriteSession<G::Handle>, FsError> {
        let handle = self.gateway.open_write(path).await?;
        debug!("opened write session on {path}");
        Ok(WriteSession::new(handle, Arc::clone(&self.registry), path))
    }

    /// Open `path` for sequential reading.
    pub async fn open(&self, path: &str) -> Result<ReadSession<G::Handle>, FsError> {
        let handle = self.gateway.open_read(path).await?;
        debug!("opened read session on {path}");
        Ok(ReadSession::new(handle, Arc::clone(&self.registry), path))
    }

    /// Sessions currently open on this client.
    pub fn open_streams(&self) -> usize {
        self.registry.open_count()
    }

    /// Sessions dropped without being closed; each one leaked a remote
    /// handle.
    pub fn leaked_streams(&self) -> usize {
        self.registry.leaked_count()
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::localfs::LocalFsGateway;
    use crate::ipc::memory::InMemoryGateway;

    #[tokio::test]
    async fn test_write_then_read_roundtrip_localfs() {
        let tmp = tempfile::tempdir().unwrap();
        let client = FsClient::new(LocalFsGateway::new(tmp.path()));

        let mut w = client.create("/out/part-00000").await.unwrap();
        w.write(b"key\tvalue\n").await.unwrap();
        w.write_byte(b'#').await.unwrap();
        w.flush().await.unwrap();
        assert_eq!(client.open_streams(), 1);
        w.close().await.unwrap();
        assert_eq!(client.open_streams(), 0);

        let mut r = client.open("/out/part-00000").await.unwrap();
        assert_eq!(r.read(10).await.unwrap(), b"key\tvalue\n");
        assert_eq!(r.read_byte().await.unwrap(), Some(b'#'));
        assert_eq!(r.read_byte().await.unwrap(), None);
        r.close().await.unwrap();
        assert_eq!(client.open_streams(), 0);
        assert_eq!(client.leaked_streams(), 0);
    }

    #[tokio::test]
    async fn test_registry_empties_regardless_of_close_order() {
        let client = FsClient::new(InMemoryGateway::new());

        let mut a = client.create("/a").await.unwrap();
        let mut b = client.create("/b").await.unwrap();
        assert_eq!(client.open_streams(), 2);
        assert_eq!(client.registry().open_write_paths().len(), 2);

        b.close().await.unwrap();
        assert_eq!(client.open_streams(), 1);
        a.close().await.unwrap();
        assert_eq!(client.open_streams(), 0);

        // closing again stays a no-op
        a.close().await.unwrap();
        b.close().await.unwrap();
        assert_eq!(client.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_dropped_session_is_reported_as_leak() {
        let client = FsClient::new(InMemoryGateway::new());
        {
            let _w = client.create("/leaky").await.unwrap();
            assert_eq!(client.open_streams(), 1);
        }
        assert_eq!(client.open_streams(), 0);
        assert_eq!(client.leaked_streams(), 1);
    }

    #[tokio::test]
    async fn test_open_missing_file_is_io_error() {
        let client = FsClient::new(InMemoryGateway::new());
        assert!(matches!(
            client.open("/absent").await,
            Err(FsError::Io(_))
        ));
        assert_eq!(client.open_streams(), 0);
    }
}
