//! ipcfs: client SDK for a remote distributed filesystem reached through a
//! local IPC gateway daemon.
//!
//! The crate implements the file I/O session layer: a session translates a
//! sequence of byte-buffer calls into absolute-offset requests against an
//! exclusively-owned remote file handle, and coordinates the handle's
//! open/close lifecycle with the owning filesystem client so handles are
//! never leaked and open-stream accounting stays consistent.
//!
//! The IPC transport itself (framing, connection setup, auth) is out of
//! scope; it is reached through the `ipc::handle::Gateway` boundary and its
//! failures surface as `error::FsError::Io`.

pub mod client;
pub mod error;
pub mod ipc;
pub mod session;
