//! IPC gateway boundary
//!
//! Responsibilities:
//! - Define the capability surface the gateway daemon exposes per open file
//!   (`FileHandle`) and per mount (`Gateway`).
//! - Keep the transport itself (framing, connection establishment, auth) out
//!   of the session layer; transport failures surface as `FsError::Io`.
//!
//! Submodules:
//! - `handle`: `FileHandle` and `Gateway` traits
//! - `localfs`: local-directory gateway for development and tests
//! - `memory`: in-memory gateway with request recording and fault injection

pub mod handle;
pub mod localfs;
pub mod memory;
