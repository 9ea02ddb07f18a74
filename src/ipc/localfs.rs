//! Local-directory gateway: serves handles backed by files under a root
//! directory. Stands in for the real daemon during development and tests.

use crate::error::FsError;
use crate::ipc::handle::{FileHandle, Gateway};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

pub struct LocalFsGateway {
    root: PathBuf,
}

impl LocalFsGateway {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Gateway for LocalFsGateway {
    type Handle = LocalFsHandle;

    async fn open_read(&self, path: &str) -> Result<LocalFsHandle, FsError> {
        let file = File::open(self.path_for(path)).await?;
        Ok(LocalFsHandle {
            file: Mutex::new(file),
        })
    }

    async fn open_write(&self, path: &str) -> Result<LocalFsHandle, FsError> {
        let path = self.path_for(path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;
        Ok(LocalFsHandle {
            file: Mutex::new(file),
        })
    }
}

/// Handle over one local file; positioned I/O via seek + read/write. The
/// file descriptor is released when the handle is dropped.
pub struct LocalFsHandle {
    file: Mutex<File>,
}

#[async_trait]
impl FileHandle for LocalFsHandle {
    async fn write_file_data(&self, data: &[u8], file_offset: u64) -> Result<(), FsError> {
        let mut f = self.file.lock().await;
        f.seek(SeekFrom::Start(file_offset)).await?;
        f.write_all(data).await?;
        Ok(())
    }

    async fn read_file_data(&self, len: usize, file_offset: u64) -> Result<Vec<u8>, FsError> {
        let mut f = self.file.lock().await;
        f.seek(SeekFrom::Start(file_offset)).await?;
        let mut out = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = f.read(&mut out[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        out.truncate(filled);
        Ok(out)
    }

    async fn flush(&self) -> Result<(), FsError> {
        let mut f = self.file.lock().await;
        f.flush().await?;
        f.sync_data().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), FsError> {
        self.file.lock().await.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_localfs_handle_positioned_io() {
        let tmp = tempfile::tempdir().unwrap();
        let gw = LocalFsGateway::new(tmp.path());

        let h = gw.open_write("/a/b/data.bin").await.unwrap();
        h.write_file_data(b"hello world", 0).await.unwrap();
        h.write_file_data(b"HELLO", 6).await.unwrap();
        h.flush().await.unwrap();
        h.close().await.unwrap();
        drop(h);

        let r = gw.open_read("/a/b/data.bin").await.unwrap();
        let out = r.read_file_data(11, 0).await.unwrap();
        assert_eq!(out, b"hello HELLO");

        // short read past the end
        let tail = r.read_file_data(64, 6).await.unwrap();
        assert_eq!(tail, b"HELLO");
    }

    #[tokio::test]
    async fn test_localfs_open_read_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let gw = LocalFsGateway::new(tmp.path());
        assert!(gw.open_read("/nope.bin").await.is_err());
    }
}
