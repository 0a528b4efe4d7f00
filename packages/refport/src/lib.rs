//! refport: import and export opaque object-reference handles via
//! human-readable instruction strings.
//!
//! One instruction string - `name_service#foo/bar`, `file#/tmp/x.ref`,
//! `exec#cat x.ref`, `dynamic#my_strategy`, `server_publish#...` or a bare
//! `IOR:...`-style locator - selects the backend that publishes or
//! retrieves a handle. The engine lives in `refport-core`; the OS-backed
//! collaborators live in `refport-sys`; this crate re-exports both.

pub use refport_core::*;
pub use refport_sys::{ConsoleStrategy, SysFiles, SysLauncher};
