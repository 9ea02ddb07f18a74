//! In-memory gateway for tests: a shared file map plus per-handle request
//! recording and write-fault injection.

use crate::error::FsError;
use crate::ipc::handle::{FileHandle, Gateway};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded `write_file_data` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCall {
    pub file_offset: u64,
    pub len: usize,
}

#[derive(Default)]
struct Shared {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

#[derive(Default)]
pub struct InMemoryGateway {
    shared: Arc<Shared>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of `path`, if it exists.
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.shared.files.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    type Handle = InMemoryHandle;

    async fn open_read(&self, path: &str) -> Result<InMemoryHandle, FsError> {
        if !self.shared.files.lock().unwrap().contains_key(path) {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            )));
        }
        Ok(InMemoryHandle::new(path, Arc::clone(&self.shared)))
    }

    async fn open_write(&self, path: &str) -> Result<InMemoryHandle, FsError> {
        self.shared
            .files
            .lock()
            .unwrap()
            .insert(path.to_string(), Vec::new());
        Ok(InMemoryHandle::new(path, Arc::clone(&self.shared)))
    }
}

/// Handle over one in-memory file. Records every write request and counts
/// close calls so tests can assert on the exact traffic a session produced.
pub struct InMemoryHandle {
    path: String,
    shared: Arc<Shared>,
    writes: Arc<Mutex<Vec<WriteCall>>>,
    closes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryHandle {
    fn new(path: &str, shared: Arc<Shared>) -> Self {
        Self {
            path: path.to_string(),
            shared,
            writes: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Probe that keeps observing the handle's traffic after a session has
    /// taken ownership of it.
    pub fn probe(&self) -> HandleProbe {
        HandleProbe {
            writes: Arc::clone(&self.writes),
            closes: Arc::clone(&self.closes),
            fail_writes: Arc::clone(&self.fail_writes),
        }
    }
}

pub struct HandleProbe {
    writes: Arc<Mutex<Vec<WriteCall>>>,
    closes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl HandleProbe {
    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Make subsequent `write_file_data` calls fail until cleared.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileHandle for InMemoryHandle {
    async fn write_file_data(&self, data: &[u8], file_offset: u64) -> Result<(), FsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FsError::Io(io::Error::other("injected write failure")));
        }
        let mut files = self.shared.files.lock().unwrap();
        let buf = files.entry(self.path.clone()).or_default();
        let start = file_offset as usize;
        let end = start + data.len();
        if buf.len() < end {
            buf.resize(end, 0);
        }
        buf[start..end].copy_from_slice(data);
        self.writes.lock().unwrap().push(WriteCall {
            file_offset,
            len: data.len(),
        });
        Ok(())
    }

    async fn read_file_data(&self, len: usize, file_offset: u64) -> Result<Vec<u8>, FsError> {
        let files = self.shared.files.lock().unwrap();
        let buf = files.get(&self.path).cloned().unwrap_or_default();
        let start = (file_offset as usize).min(buf.len());
        let end = (start + len).min(buf.len());
        Ok(buf[start..end].to_vec())
    }

    async fn flush(&self) -> Result<(), FsError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), FsError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_gateway_records_writes() {
        let gw = InMemoryGateway::new();
        let h = gw.open_write("/f").await.unwrap();
        let probe = h.probe();

        h.write_file_data(b"abc", 0).await.unwrap();
        h.write_file_data(b"zz", 10).await.unwrap();

        assert_eq!(
            probe.writes(),
            vec![
                WriteCall {
                    file_offset: 0,
                    len: 3
                },
                WriteCall {
                    file_offset: 10,
                    len: 2
                },
            ]
        );
        // hole between the two writes is zero-filled
        let contents = gw.contents("/f").unwrap();
        assert_eq!(&contents[..3], b"abc");
        assert!(contents[3..10].iter().all(|&b| b == 0));
        assert_eq!(&contents[10..], b"zz");
    }

    #[tokio::test]
    async fn test_memory_gateway_fault_injection() {
        let gw = InMemoryGateway::new();
        let h = gw.open_write("/f").await.unwrap();
        let probe = h.probe();

        probe.fail_writes(true);
        assert!(matches!(
            h.write_file_data(b"abc", 0).await,
            Err(FsError::Io(_))
        ));
        assert!(probe.writes().is_empty());

        probe.fail_writes(false);
        h.write_file_data(b"abc", 0).await.unwrap();
        assert_eq!(probe.writes().len(), 1);
    }
}
